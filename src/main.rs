//! # smart-downsample CLI
//!
//! Command-line interface for the diversity-selection engine.
//!
//! ## Usage
//! ```bash
//! smart-downsample select hashes.tsv --target 500
//! smart-downsample select hashes.tsv --target 50 --mode exact --output json
//! ```

mod cli;

use smart_downsample::Result;

fn main() -> Result<()> {
    cli::run()
}
