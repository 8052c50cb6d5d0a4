//! `architecture-lint` binary: lints `provisioner/src` and exits non-zero on
//! any violation.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use architecture_lint::lint_tree;

fn main() -> ExitCode {
    let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../provisioner/src");
    let mut stderr = io::stderr().lock();
    match lint_tree(&src_dir) {
        Ok(violations) if violations.is_empty() => ExitCode::SUCCESS,
        Ok(violations) => {
            for violation in &violations {
                let _ = writeln!(stderr, "{violation}");
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            let _ = writeln!(stderr, "{err}");
            ExitCode::FAILURE
        }
    }
}
