//! k8s-crd-resolver CLI binary

use anyhow::Result;

use k8s_crd_resolver::cli::CliApp;

fn main() -> Result<()> {
    // Logs go to stderr, stdout may carry the resolved CRD
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,k8s_crd_resolver=info,crd_resolver_crd=info".into()),
        )
        .init();

    // Parse command line arguments
    let matches = CliApp::app().get_matches();

    // Run the CLI application
    CliApp::run(&matches)
}
