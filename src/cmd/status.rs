//! Print each node's fan readings

use tracing::error;

use sirocco_bmc::{BmcConfig, FanOps};

use crate::config::{NodeTarget, Settings};

/// Read and print fan info from every target, one worker per node
pub async fn run(settings: &Settings, targets: Vec<NodeTarget>) {
    let mut workers = Vec::new();
    for target in targets {
        let config = settings.bmc_config(&target);
        workers.push(tokio::spawn(read_node_fans(target, config)));
    }
    for worker in workers {
        let _ = worker.await;
    }
}

async fn read_node_fans(target: NodeTarget, config: BmcConfig) {
    let controller = match super::fans::connect(&target, config).await {
        Ok(controller) => controller,
        Err(e) => {
            error!(node = target.id, host = %target.host, error = %e, "Login failed");
            return;
        }
    };

    match controller.fan_info().await {
        Ok(fans) => {
            println!("Node {} ({}):", target.id, target.host);
            for fan in fans {
                println!("  {fan}");
            }
        }
        Err(e) => {
            error!(node = target.id, host = %target.host, error = %e, "Failed to read fan info");
        }
    }
}
