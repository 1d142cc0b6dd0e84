use image_mirror::OutputManager;
use image_mirror::cli::{Args, MirrorConfig, Runner};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse_args().with_process_env();

    let output = if args.quiet {
        OutputManager::new_quiet()
    } else {
        OutputManager::new(args.verbose)
    };

    let config = match MirrorConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            return exit_code(e.exit_code());
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            output.error(&format!("Failed to start runtime: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let runner = Runner::new(config, output.clone());
    match runtime.block_on(runner.run()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&e.to_string());
            exit_code(e.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
