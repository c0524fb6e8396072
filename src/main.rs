use std::process::ExitCode;

fn main() -> ExitCode {
    vendorprune::cli::real_cli()
}
