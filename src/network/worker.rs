use super::protocol::Command;
use super::sink::{NetworkSink, OUTBOUND_CAPACITY};
use crate::config::RunArguments;
use crate::error::{LfResult, LineupForgeError};
use crate::optimizer::{AggregateResult, ExhaustiveOptimizer, ResultDocument, StopSignal};
use crate::stats::StatsDocument;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{error, info};

async fn write_command<W: AsyncWrite + Unpin>(writer: &mut W, command: &Command) -> LfResult<()> {
    let line = command.encode()?;
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(|e| LineupForgeError::Network(format!("Failed to send {}: {}", command.name(), e)))?;
    writer
        .flush()
        .await
        .map_err(|e| LineupForgeError::Network(e.to_string()))
}

/// Connects to a peer, announces READY, runs the single job it sends and streams the results back.
///
/// A failure after the job has been received is reported to the peer with an ERROR command
/// before being returned.
pub async fn run_network_worker(addr: &str, stop: StopSignal) -> LfResult<Arc<AggregateResult>> {
    info!("Connecting to {}", addr);
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| LineupForgeError::Network(format!("Cannot connect to {}: {}", addr, e)))?;
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    write_command(&mut write_half, &Command::Ready).await?;

    let line = lines
        .next_line()
        .await
        .map_err(|e| LineupForgeError::Network(e.to_string()))?
        .ok_or_else(|| {
            LineupForgeError::Protocol("Peer closed the connection before sending DATA".to_string())
        })?;

    let (stats, arguments, prior) = match Command::decode(&line)? {
        Command::Data {
            stats,
            arguments,
            prior,
        } => (stats, arguments, prior),
        other => {
            return Err(LineupForgeError::Protocol(format!(
                "Expected DATA, received {}",
                other.name()
            )))
        }
    };
    info!(
        players = stats.players.len(),
        lineup_type = %arguments.lineup_type,
        resume = prior.is_some(),
        "Received job"
    );

    let (tx, mut rx) = mpsc::channel::<Command>(OUTBOUND_CAPACITY);
    let writer = tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            write_command(&mut write_half, &command).await?;
        }
        Ok::<_, LineupForgeError>(write_half)
    });

    let job = tokio::task::spawn_blocking(move || run_job(stats, arguments, prior, tx, stop))
        .await
        .map_err(|e| LineupForgeError::TaskFailed {
            index: 0,
            reason: format!("engine thread failed: {}", e),
        })
        .and_then(|r| r);

    // The sink was dropped with the job, so the writer drains what is queued and stops
    let written = writer
        .await
        .map_err(|e| LineupForgeError::Network(format!("writer task failed: {}", e)))?;

    match (job, written) {
        (Ok(result), Ok(mut write_half)) => {
            let _ = write_half.shutdown().await;
            info!(score = result.score(), "Job finished");
            Ok(result)
        }
        (Err(e), Ok(mut write_half)) => {
            error!("Job failed: {}", e);
            let report = Command::Error {
                message: e.to_string(),
            };
            if let Err(send_err) = write_command(&mut write_half, &report).await {
                error!("Could not report the failure to the peer: {}", send_err);
            }
            let _ = write_half.shutdown().await;
            Err(e)
        }
        // A dead connection explains any sink error the engine saw
        (_, Err(e)) => Err(e),
    }
}

fn run_job(
    stats: StatsDocument,
    arguments: RunArguments,
    prior: Option<ResultDocument>,
    tx: mpsc::Sender<Command>,
    stop: StopSignal,
) -> LfResult<Arc<AggregateResult>> {
    stats.validate()?;
    let optimizer = ExhaustiveOptimizer::from_arguments(&stats, &arguments)?;
    let prior = prior.map(|doc| optimizer.resume_point(doc)).transpose()?;

    let interval = Duration::from_millis(arguments.params.update_interval_ms);
    let mut sink = NetworkSink::new(tx, interval)
        .with_min_lineups(arguments.params.update_interval_lineups);
    optimizer.run(prior.as_ref(), &mut sink, &stop)
}
