use std::path::Path;
use updater::checksum::checksum_file_async;
use updater::core::{UpdaterError, UpdaterResult};

pub async fn run(file: &Path) -> UpdaterResult<()> {
    match checksum_file_async(file.to_path_buf()).await? {
        Some(checksum) => {
            println!("{}  {}", checksum, file.display());
            Ok(())
        }
        None => Err(UpdaterError::Path(format!(
            "{} is not a file",
            file.display()
        ))),
    }
}
