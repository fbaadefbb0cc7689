use eyre::Result;
use kiln_common::utils::io::file::write_file;
use tracing::info;

/// Emits `contents` according to `output`:
/// - if `output` is `print`, write it to stdout
/// - otherwise treat `output` as a file path and write it there, creating parent directories
pub(crate) fn emit(output: &str, contents: &str) -> Result<()> {
    if output == "print" {
        println!("{contents}");
        return Ok(());
    }

    write_file(output, contents)?;
    info!("wrote output to '{}'", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_common::utils::io::file::{delete_path, read_file};

    #[test]
    fn test_emit_to_file() {
        let path = std::env::temp_dir().join("kiln-cli-output-test").join("result.json");
        let path = path.to_str().expect("temp path is valid utf-8");

        emit(path, "{}").expect("failed to emit output");
        assert_eq!(read_file(path).expect("failed to read output"), "{}");
        assert!(delete_path(path));
    }
}
