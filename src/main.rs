mod cli;
mod commands;

fn main() {
    let code = match cli::run() {
        Ok(status) => status.exit_code(),
        Err(err) => {
            eprintln!("application error: {err}");
            err.exit_code()
        }
    };
    std::process::exit(code);
}
