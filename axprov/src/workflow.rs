use console::Style;
use serde::Serialize;

use axprov_client::error::CallError;
use axprov_client::{AxlApi, AxlResponse};
use axprov_types::{EndUser, Phone, UserUpdate};

use crate::confirm::Confirmation;

/// What the walkthrough provisions and tears down again.
pub struct WalkthroughPlan {
    pub phone: Phone,
    pub user: EndUser,
    pub home_cluster: bool,
    pub im_and_presence: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    AddPhone,
    AddUser,
    AssociateDevice,
    RemoveUser,
    RemovePhone,
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Step::AddPhone => "addPhone",
            Step::AddUser => "addUser",
            Step::AssociateDevice => "updateUser",
            Step::RemoveUser => "removeUser",
            Step::RemovePhone => "removePhone",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepOutcome {
    Completed { response: AxlResponse },
    Rejected { fault: String },
    Failed { error: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
}

#[derive(thiserror::Error, Debug)]
pub enum WalkthroughError {
    #[error("Teardown failed during '{step}':\n  {cause}")]
    Teardown { step: &'static str, cause: String },
}

/// Walk the five-step sequence.
///
/// Every step is entered regardless of how the previous one went. The three
/// provisioning steps record faults and transport failures alike and move
/// on; the two teardown steps record faults but abort on a transport
/// failure.
pub async fn run(
    service: &dyn AxlApi,
    plan: &WalkthroughPlan,
    confirmation: &dyn Confirmation,
    render: bool,
) -> Result<Vec<StepReport>, WalkthroughError> {
    let mut reports = Vec::with_capacity(5);

    let result = service.add_phone(&plan.phone).await;
    reports.push(report(Step::AddPhone, provisioning_outcome(result), render));

    confirmation.wait("Press Enter to continue...");

    let result = service.add_user(&plan.user).await;
    reports.push(report(Step::AddUser, provisioning_outcome(result), render));

    confirmation.wait("Press Enter to continue...");

    let update = UserUpdate {
        user_id: Clone::clone(&plan.user.user_id),
        associated_devices: vec![Clone::clone(&plan.phone.name)],
        home_cluster: plan.home_cluster,
        im_and_presence_enable: plan.im_and_presence,
    };
    let result = service.update_user(&update).await;
    reports.push(report(Step::AssociateDevice, provisioning_outcome(result), render));

    confirmation.wait("Press Enter to continue...");

    let result = service.remove_user(&plan.user.user_id).await;
    reports.push(report(Step::RemoveUser, teardown_outcome(result)?, render));

    let result = service.remove_phone(&plan.phone.name).await;
    reports.push(report(Step::RemovePhone, teardown_outcome(result)?, render));

    Ok(reports)
}

fn provisioning_outcome(result: Result<AxlResponse, CallError>) -> StepOutcome {
    match result {
        Ok(response) => StepOutcome::Completed { response },
        Err(CallError::Fault { fault, .. }) => StepOutcome::Rejected { fault: fault.to_string() },
        Err(error @ CallError::Transport { .. }) => StepOutcome::Failed { error: error.to_string() },
    }
}

fn teardown_outcome(result: Result<AxlResponse, CallError>) -> Result<StepOutcome, WalkthroughError> {
    match result {
        Ok(response) => Ok(StepOutcome::Completed { response }),
        Err(CallError::Fault { fault, .. }) => Ok(StepOutcome::Rejected { fault: fault.to_string() }),
        Err(CallError::Transport { operation, cause }) => {
            Err(WalkthroughError::Teardown { step: operation, cause: cause.to_string() })
        }
    }
}

fn report(step: Step, outcome: StepOutcome, render: bool) -> StepReport {
    if render {
        match &outcome {
            StepOutcome::Completed { response } => {
                println!("\n{} response:", step.label());
                if let Some(value) = &response.return_value {
                    println!("  return: {value}");
                }
                println!("{}", response.body);
            }
            StepOutcome::Rejected { fault } => {
                let yellow = Style::new().yellow();
                println!("\n{}", yellow.apply_to(format!("{}: rejected by the server: {fault}", step.label())));
            }
            StepOutcome::Failed { error } => {
                let red = Style::new().red();
                println!("\n{}", red.apply_to(format!("{}: {error}", step.label())));
            }
        }
    }
    StepReport { step, outcome }
}
