//! Switch the fan controller mode without touching duty

use tracing::error;

use sirocco_bmc::{BmcConfig, FanMode, FanOps};

use crate::config::{NodeTarget, Settings};

/// Set the controller mode on every target, one worker per node
pub async fn run(settings: &Settings, targets: Vec<NodeTarget>, mode: FanMode) {
    let mut workers = Vec::new();
    for target in targets {
        let config = settings.bmc_config(&target);
        workers.push(tokio::spawn(set_node_mode(target, config, mode)));
    }
    for worker in workers {
        let _ = worker.await;
    }
    println!("All fan control operations completed");
}

async fn set_node_mode(target: NodeTarget, config: BmcConfig, mode: FanMode) {
    let controller = match super::fans::connect(&target, config).await {
        Ok(controller) => controller,
        Err(e) => {
            error!(node = target.id, host = %target.host, error = %e, "Login failed");
            return;
        }
    };

    if let Err(e) = controller.set_mode(mode).await {
        error!(node = target.id, host = %target.host, error = %e, "Failed to set fan mode");
        return;
    }

    println!(
        "Completed fan control for node {} in {} mode",
        target.host, mode
    );
}
