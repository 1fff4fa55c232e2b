use std::process::ExitCode;

fn main() -> ExitCode {
    cropplan::logging::init();

    match cropplan::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
