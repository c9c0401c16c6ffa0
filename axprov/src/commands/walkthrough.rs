use axprov_client::AxlApi;
use axprov_types::{DeviceName, EndUser, Phone, UserId};

use crate::confirm::{AutoResume, Confirmation, StdinConfirmation};
use crate::workflow::{self, WalkthroughPlan};
use crate::WalkthroughOutputFormat;

/// Run the provisioning walkthrough against the configured call manager.
///
/// The sequence mirrors a manual provisioning session: create a softphone
/// device, create an end user, associate the device to the user, then
/// remove the user and the device again. Between the provisioning steps the
/// walkthrough pauses so the operator can inspect the result in the admin
/// pages before continuing.
#[derive(clap::Parser)]
pub struct WalkthroughCli {
    ///Name of the device to create
    #[arg(long, default_value = "CSFTESTPHONE")]
    device_name: DeviceName,
    ///ID of the end user to create
    #[arg(long, default_value = "testEndUser")]
    user_id: UserId,
    ///Password assigned to the end user
    #[arg(long, default_value = "Cisco1234!")]
    user_password: String,
    ///Print the request and response of every call
    #[arg(long)]
    debug: bool,
    ///Run without pausing for operator confirmation
    #[arg(long)]
    non_interactive: bool,
    ///Text or JSON as output format
    #[arg(value_enum, short, long, default_value_t = WalkthroughOutputFormat::Text)]
    output: WalkthroughOutputFormat,
}

impl WalkthroughCli {
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub async fn execute(self, service: &dyn AxlApi) -> crate::Result<()> {
        let plan = WalkthroughPlan {
            phone: Phone::csf(Clone::clone(&self.device_name)),
            user: EndUser::new(Clone::clone(&self.user_id), self.user_id.value(), self.user_password),
            home_cluster: true,
            im_and_presence: true,
        };

        let confirmation: Box<dyn Confirmation> = if self.non_interactive {
            Box::new(AutoResume)
        } else {
            Box::new(StdinConfirmation)
        };

        let render = matches!(&self.output, WalkthroughOutputFormat::Text);

        let reports = workflow::run(service, &plan, confirmation.as_ref(), render).await
            .map_err(|cause| format!("{cause}"))?;

        if let WalkthroughOutputFormat::Json = self.output {
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|_error| "Failed to render the walkthrough reports as JSON.")?;
            println!("{json}");
        }

        Ok(())
    }
}
