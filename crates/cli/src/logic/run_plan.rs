use crate::prelude::*;
use std::{fs::File, io::BufWriter, path::Path, sync::Arc};

fn open_sink(output: Option<&Path>) -> Result<Box<dyn SampleSink>, CliError> {
    let Some(path) = output else {
        return Ok(Box::new(LogSink));
    };
    let file = File::create(path).map_err(|underlying| CliError::Output {
        path: path.display().to_string(),
        underlying,
    })?;
    info!("Writing samples to {}", path.display());
    Ok(Box::new(JsonLinesSink::new(BufWriter::new(file))))
}

/// Cancels `cancellation` on the first Ctrl-C. Iterations already in flight
/// still complete or time out.
fn cancel_on_interrupt(cancellation: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    warn!("Interrupted, stopping after in-flight iterations");
                    cancellation.cancel();
                }
                Err(e) => warn!("Unable to listen for Ctrl-C: {e}"),
            },
            _ = cancellation.cancelled() => {}
        }
    });
}

async fn execute<S: Sampler>(
    sampler: S,
    config: &RunConfig,
    cancellation: CancellationToken,
    sink: &mut dyn SampleSink,
) -> Result<RunSummary> {
    let plan = TestPlan::builder()
        .sampler(sampler)
        .connector(Arc::new(config.connector().clone()) as Arc<dyn Connector>)
        .run_parameters(config.run_parameters().clone())
        .cancellation(cancellation)
        .build();
    plan.run(config.test_context(), sink).await
}

pub async fn run_plan(args: RunArgs) -> Result<(), CliError> {
    let config = RunConfig::try_from(args)?;
    let mut sink = open_sink(config.output().as_deref())?;

    let cancellation = CancellationToken::new();
    cancel_on_interrupt(cancellation.clone());

    let outcome = match config.sampler() {
        SamplerKind::Iou => execute(IouSampler, &config, cancellation.clone(), sink.as_mut()).await,
        SamplerKind::CashIssue => {
            execute(CashIssueSampler, &config, cancellation.clone(), sink.as_mut()).await
        }
        SamplerKind::CashIssueAndPayment => {
            execute(
                CashIssueAndPaymentSampler,
                &config,
                cancellation.clone(),
                sink.as_mut(),
            )
            .await
        }
    };
    // Releases the interrupt listener.
    cancellation.cancel();

    let summary = outcome?;
    info!(
        "Sampler `{}` done: {} samples, {} failed{}",
        config.sampler().name(),
        summary.samples(),
        summary.failures(),
        if *summary.cancelled() { " (cancelled)" } else { "" }
    );
    Ok(())
}
