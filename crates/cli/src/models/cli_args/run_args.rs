use crate::prelude::*;
use clap::Parser;
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// The sampler to run.
    #[arg(long, value_enum)]
    pub sampler: SamplerKind,

    /// Websocket JSON-RPC URL of the node, e.g. `ws://localhost:10005`.
    #[arg(long)]
    node_url: String,

    /// Number of concurrent virtual users, each with its own connection.
    #[arg(long, default_value_t = 1)]
    virtual_users: usize,

    /// Number of sequential iterations per virtual user.
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// Upper bound for a single remote call, in milliseconds. Slower calls
    /// are recorded as failed samples.
    #[arg(long, default_value_t = DEFAULT_RPC_TIMEOUT_MS)]
    rpc_timeout_ms: u64,

    /// Attempts per (re)connection. `0` connects once and never reconnects a
    /// virtual user whose connection dropped.
    #[arg(long, default_value_t = MAX_ATTEMPTS)]
    connect_attempts: usize,

    /// Delay between connection attempts, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY_MS)]
    retry_delay_ms: u64,

    /// Sampler parameter as `name=value`, may be repeated. Overrides `--params-file`.
    #[arg(short = 'J', long = "param", value_parser = parse_key_value)]
    params: Vec<(String, String)>,

    /// JSON object with sampler parameter values.
    #[arg(long)]
    params_file: Option<PathBuf>,

    /// Write samples as JSON lines to this file instead of logging them.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let Some((name, value)) = raw.split_once('=') else {
        return Err(format!("expected `name=value`, got `{raw}`"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("parameter name missing in `{raw}`"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

fn load_params_file(path: &PathBuf) -> Result<MapTestContext, InvalidCliArgs> {
    let invalid = |underlying: String| InvalidCliArgs::ParamsFileInvalid {
        path: path.display().to_string(),
        underlying,
    };
    let contents = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let json: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?;
    json.into_iter()
        .map(|(name, value)| match value {
            serde_json::Value::String(s) => Ok((name, s)),
            serde_json::Value::Number(n) => Ok((name, n.to_string())),
            serde_json::Value::Bool(b) => Ok((name, b.to_string())),
            other => Err(invalid(format!(
                "parameter `{name}` must be a string, number or boolean, got {other}"
            ))),
        })
        .collect()
}

/// Validated settings of a `run` invocation.
#[derive(Debug, Clone, Getters)]
pub struct RunConfig {
    #[getset(get = "pub")]
    sampler: SamplerKind,

    #[getset(get = "pub")]
    connector: JsonRpcConnector,

    #[getset(get = "pub")]
    run_parameters: RunParameters,

    #[getset(get = "pub")]
    test_context: MapTestContext,

    #[getset(get = "pub")]
    output: Option<PathBuf>,
}

impl TryFrom<RunArgs> for RunConfig {
    type Error = InvalidCliArgs;

    fn try_from(args: RunArgs) -> Result<Self, Self::Error> {
        let Ok(url) = Url::parse(&args.node_url) else {
            return Err(InvalidCliArgs::NodeUrlInvalid {
                bad_value: args.node_url.clone(),
            });
        };
        if args.virtual_users == 0 {
            return Err(InvalidCliArgs::VirtualUsersMustBePositive);
        }
        if args.iterations == 0 {
            return Err(InvalidCliArgs::IterationsMustBePositive);
        }
        if args.rpc_timeout_ms == 0 {
            return Err(InvalidCliArgs::RpcTimeoutCannotBeZero);
        }

        let mut test_context = match &args.params_file {
            Some(path) => load_params_file(path)?,
            None => MapTestContext::new(),
        };
        test_context.extend(args.params);

        let connector = JsonRpcConnector::builder()
            .url(url)
            .rpc_timeout(Duration::from_millis(args.rpc_timeout_ms))
            .build();

        let retry_policy = RetryPolicy::builder()
            .max_attempts(args.connect_attempts)
            .delay(Duration::from_millis(args.retry_delay_ms))
            .build();

        let run_parameters = RunParameters::builder()
            .virtual_users(args.virtual_users)
            .iterations_per_user(args.iterations)
            .retry_policy(retry_policy)
            .build();

        Ok(Self {
            sampler: args.sampler,
            connector,
            run_parameters,
            test_context,
            output: args.output,
        })
    }
}
