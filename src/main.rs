use std::process::ExitCode;

fn main() -> ExitCode {
    sigma_schedules::app::init_tracing();
    match sigma_schedules::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
