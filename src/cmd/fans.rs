//! Set fan duty across the targeted nodes
//!
//! One worker task per node, each owning its own client and session. A node
//! that fails any step logs it and stops there; its siblings keep going,
//! and the run always ends with the blanket completion line.

use tracing::error;

use sirocco_bmc::{apply_duty, BmcClient, BmcConfig, FanController, FanMode, FanOps};

use crate::config::{NodeTarget, Settings};

/// Run the full login → manual mode → duty fan-out sequence on every target
pub async fn run(settings: &Settings, targets: Vec<NodeTarget>, rate: u8) {
    let mut workers = Vec::new();
    for target in targets {
        let config = settings.bmc_config(&target);
        let fan_count = settings.fan_count;
        workers.push(tokio::spawn(set_node_fans(target, config, rate, fan_count)));
    }
    for worker in workers {
        // A panicked worker is that node's problem, not the run's
        let _ = worker.await;
    }
    println!("All fan control operations completed");
}

/// One node's sequence; any step failing ends the node here
async fn set_node_fans(target: NodeTarget, config: BmcConfig, rate: u8, fan_count: usize) {
    let controller = match connect(&target, config).await {
        Ok(controller) => controller,
        Err(e) => {
            error!(node = target.id, host = %target.host, error = %e, "Login failed");
            return;
        }
    };

    if let Err(e) = controller.set_mode(FanMode::Manual).await {
        error!(node = target.id, host = %target.host, error = %e, "Failed to set manual mode");
        return;
    }

    apply_duty(&controller, rate, fan_count).await;
    println!("Completed fan control for node {}", target.host);
}

/// Login handshake for one node
pub(crate) async fn connect(
    target: &NodeTarget,
    config: BmcConfig,
) -> sirocco_bmc::Result<FanController> {
    let client = BmcClient::new(config)?;
    let session = client.login().await?;
    Ok(FanController::new(client, session))
}
