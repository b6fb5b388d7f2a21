use std::path::Path;
use std::process::Command;

/// Run `rustfmt` over one generated file.
///
/// `BRRTWIRE_RUSTFMT_BIN` overrides the binary, which lets tests substitute a
/// stub without touching `PATH`.
pub fn format_file(path: &Path) -> anyhow::Result<()> {
    let rustfmt_bin = std::env::var("BRRTWIRE_RUSTFMT_BIN").unwrap_or_else(|_| "rustfmt".to_string());

    let status = Command::new(&rustfmt_bin)
        .arg("--edition")
        .arg("2021")
        .arg(path)
        .status()?;
    if !status.success() {
        anyhow::bail!("{} failed on {}", rustfmt_bin, path.display());
    }
    Ok(())
}
