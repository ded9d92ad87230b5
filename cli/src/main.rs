mod arg_parser;

use arg_parser::{ArgParser, ExitPolicy};
use fanout::{Report, Runner, Sinks};

use clap::Parser;
use std::error;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const MESSAGE_CAPACITY: usize = 32;
// 128 + SIGINT, what a shell reports for a job killed by Ctrl-C
const INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn error::Error>> {
    let args = ArgParser::parse();

    // logs go to stderr so they never mix into relayed stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();

    let config = args.config()?;
    let runner = Runner::spawn(Sinks::stdio(), MESSAGE_CAPACITY);

    // spawn failures are logged by the runner
    let job_ids: Vec<_> = runner
        .run_all(config.job_specs())
        .await
        .into_iter()
        .filter_map(Result::ok)
        .collect();
    debug!(jobs = job_ids.len(), "all jobs launched");

    // first Ctrl-C stops every job and waits for their output, the second one exits right away
    let wait = runner.wait_all();
    tokio::pin!(wait);
    let mut interrupted = false;
    let report = loop {
        tokio::select! {
            report = &mut wait => break report?,
            signal = tokio::signal::ctrl_c() => {
                signal?;
                if interrupted {
                    warn!("interrupted again, exiting without waiting for jobs");
                    return Ok(ExitCode::from(INTERRUPTED));
                }
                interrupted = true;
                warn!("interrupted, stopping jobs");
                for job_id in &job_ids {
                    let _ = runner.stop_job(*job_id).await;
                }
            }
        }
    };

    if args.summary {
        for outcome in &report.outcomes {
            eprintln!("{}", outcome);
        }
    }
    Ok(exit_code(args.exit_code, &report, interrupted))
}

fn exit_code(policy: ExitPolicy, report: &Report, interrupted: bool) -> ExitCode {
    if interrupted {
        return ExitCode::from(INTERRUPTED);
    }
    let ok = match policy {
        ExitPolicy::Aggregate => report.success(),
        ExitPolicy::Ignore => report.all_started(),
    };
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanout::{JobOutcome, JobSpec, JobStatus};

    fn report(outcomes: Vec<JobOutcome>) -> Report {
        Report::new(outcomes)
    }

    fn finished(code: i32) -> JobOutcome {
        JobOutcome::Finished {
            job_id: uuid::Uuid::new_v4(),
            spec: JobSpec::new("bazel", ["build", ":tests"]),
            status: JobStatus::Exited { code },
        }
    }

    // ExitCode has no PartialEq, compare through Debug
    fn same(a: ExitCode, b: ExitCode) -> bool {
        format!("{:?}", a) == format!("{:?}", b)
    }

    #[test]
    fn ignore_policy_only_fails_on_spawn_errors() {
        let failed_build = report(vec![finished(0), finished(1)]);
        assert!(same(exit_code(ExitPolicy::Ignore, &failed_build, false), ExitCode::SUCCESS));

        let not_started = report(vec![JobOutcome::NotStarted {
            spec: JobSpec::new("bazel", ["build", ":tests"]),
            error: "not found".into(),
        }]);
        assert!(same(exit_code(ExitPolicy::Ignore, &not_started, false), ExitCode::FAILURE));
    }

    #[test]
    fn aggregate_policy_fails_on_any_failed_job() {
        let failed_build = report(vec![finished(0), finished(1)]);
        assert!(same(exit_code(ExitPolicy::Aggregate, &failed_build, false), ExitCode::FAILURE));
        let all_good = report(vec![finished(0), finished(0)]);
        assert!(same(exit_code(ExitPolicy::Aggregate, &all_good, false), ExitCode::SUCCESS));
    }

    #[test]
    fn interrupted_run_never_exits_zero() {
        let killed = report(vec![JobOutcome::Finished {
            job_id: uuid::Uuid::new_v4(),
            spec: JobSpec::new("bazel", ["build", ":tests"]),
            status: JobStatus::Killed { signal: 9 },
        }]);
        for policy in [ExitPolicy::Ignore, ExitPolicy::Aggregate] {
            assert!(same(exit_code(policy, &killed, true), ExitCode::from(130)));
        }

        // even when every job had already finished cleanly
        let all_good = report(vec![finished(0)]);
        assert!(same(exit_code(ExitPolicy::Ignore, &all_good, true), ExitCode::from(130)));
    }
}
