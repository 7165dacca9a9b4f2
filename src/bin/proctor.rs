// Proctor CLI with the demo candidates registered.
// Usage: proctor run suites/ --verbose

use proctor::{cli, demos};

fn main() {
    cli::run_with(demos::demo_registry());
}
