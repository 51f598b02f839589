use dtree_session::logging::{LogFormat, install_subscriber};
use dtree_session::{PrunePolicy, Session, SessionConfig, decode_message, outline};
use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

struct Config {
    input: PathBuf,
    prune_policy: Option<PrunePolicy>,
    json_logs: bool,
}

fn print_usage() {
    eprintln!(
        "Usage: dtree-replay --input <file.jsonl> [--prune-policy <policy>] [--json-logs]\n\
         \n\
         Replays a recorded message stream and prints the resulting tree.\n\
         Policies: on_completion (default), on_any_finish, never.\n\
         Log filter: DTREE_LOG (default info).\n\
         \n\
         Example:\n\
           dtree-replay --input /tmp/session.jsonl --prune-policy never"
    );
}

fn parse_args() -> Result<Config, String> {
    let mut args = env::args().skip(1);
    let mut input: Option<PathBuf> = None;
    let mut prune_policy: Option<PrunePolicy> = None;
    let mut json_logs = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--input requires a value".to_string())?;
                input = Some(PathBuf::from(value));
            }
            "--prune-policy" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--prune-policy requires a value".to_string())?;
                prune_policy = Some(value.parse::<PrunePolicy>().map_err(|e| e.to_string())?);
            }
            "--json-logs" => json_logs = true,
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    let input = input.ok_or_else(|| "missing --input".to_string())?;
    Ok(Config {
        input,
        prune_policy,
        json_logs,
    })
}

fn run() -> Result<(), Box<dyn Error>> {
    let cfg = parse_args().inspect_err(|_| {
        print_usage();
    })?;

    let format = if cfg.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    install_subscriber(format)?;

    let mut config = SessionConfig::from_env()?;
    if let Some(policy) = cfg.prune_policy {
        config = config.with_prune_policy(policy);
    }

    let text = fs::read_to_string(&cfg.input)?;
    let mut session = Session::new(config);
    let mut handled = 0usize;
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let number = index + 1;
        let message = decode_message(line).map_err(|err| format!("line {number}: {err}"))?;
        session
            .handle(message)
            .map_err(|err| format!("line {number}: {err}"))?;
        handled += 1;
    }
    tracing::info!(
        messages = handled,
        leaves = session.tree().leaf_count(),
        "replay finished"
    );

    print!("{}", outline(session.tree()));
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("dtree-replay error: {err}");
        std::process::exit(1);
    }
}
