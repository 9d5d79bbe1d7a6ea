use crate::prelude::*;

use std::io::Write;

/// Receives every sample recorded during a run.
pub trait SampleSink: Send {
    fn record(&mut self, sample: Sample) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps all samples in memory.
#[derive(Debug, Default, Getters)]
pub struct VecSink {
    #[getset(get = "pub")]
    samples: Vec<Sample>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl SampleSink for VecSink {
    fn record(&mut self, sample: Sample) -> Result<(), SinkError> {
        self.samples.push(sample);
        Ok(())
    }
}

/// Writes one JSON object per sample and line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> SampleSink for JsonLinesSink<W> {
    fn record(&mut self, sample: Sample) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &sample)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(SinkError::from)
    }
}

/// Logs each sample at `debug` level, failures at `warn`.
#[derive(Debug, Default)]
pub struct LogSink;

impl SampleSink for LogSink {
    fn record(&mut self, sample: Sample) -> Result<(), SinkError> {
        let origin = sample.origin();
        if *sample.success() {
            debug!(
                "VU {} #{}: {} ok in {} ms",
                origin.virtual_user,
                origin.iteration,
                sample.label(),
                sample.latency().as_millis()
            );
        } else {
            warn!(
                "VU {} #{}: {} failed after {} ms: {}",
                origin.virtual_user,
                origin.iteration,
                sample.label(),
                sample.latency().as_millis(),
                sample.error_detail().as_deref().unwrap_or_default()
            );
        }
        Ok(())
    }
}
