use crate::reports;
use clap::Args;
use lineupforge::error::{LfResult, LineupForgeError};
use lineupforge::network::run_network_worker;
use lineupforge::optimizer::StopSignal;

#[derive(Args, Debug, Clone)]
pub struct WorkerArgs {
    /// Address of the peer that hands out the job
    #[arg(short = 'c', long, default_value = "127.0.0.1:8414")]
    pub connect: String,
}

pub fn run(args: WorkerArgs) -> LfResult<()> {
    let stop = StopSignal::new();
    super::watch_for_interrupt(stop.clone());

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| LineupForgeError::Network(format!("Cannot start async runtime: {}", e)))?;
    let result = runtime.block_on(run_network_worker(&args.connect, stop))?;

    reports::print_summary(&result);
    Ok(())
}
