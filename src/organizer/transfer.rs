use crate::error::{OrganizerError, Result};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// 元ファイルを削除
    Move,
    /// 元ファイルを残す
    Copy,
}

/// `source` を `target_dir/file_name` へ移動またはコピーする
///
/// 出力先ディレクトリは必要に応じて作成する（既に存在していれば成功扱い）。
/// 出力先に同名ファイルがあれば上書きする。
pub fn place(source: &Path, target_dir: &Path, file_name: &str, mode: TransferMode) -> Result<()> {
    let failed = |cause: String| OrganizerError::MoveFailed {
        source_path: source.to_path_buf(),
        target_dir: target_dir.to_path_buf(),
        cause,
    };

    ensure_dir(target_dir).map_err(|e| failed(e.to_string()))?;

    let dest = target_dir.join(file_name);
    if dest.is_dir() {
        return Err(failed("destination is a directory".into()));
    }

    let transferred = match mode {
        TransferMode::Move => move_file(source, &dest),
        TransferMode::Copy => fs::copy(source, &dest).map(|_| ()),
    };
    transferred.map_err(|e| failed(e.to_string()))?;

    let verb = match mode {
        TransferMode::Move => "Moved",
        TransferMode::Copy => "Copied",
    };
    let dir_name = target_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| target_dir.display().to_string());
    println!("{}: {} -> {}", verb, file_name, dir_name);
    Ok(())
}

/// 並行して同じディレクトリを作っても失敗しない
fn ensure_dir(dir: &Path) -> io::Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(_) if dir.is_dir() => Ok(()),
        Err(e) if dir.exists() => Err(io::Error::new(
            e.kind(),
            format!("target is not a directory: {}", dir.display()),
        )),
        Err(e) => Err(e),
    }
}

fn move_file(source: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            // 別ファイルシステム間ではrenameできないのでコピーしてから削除
            log::debug!(
                "rename {} failed ({}), falling back to copy",
                source.display(),
                rename_err
            );
            fs::copy(source, dest).map_err(|_| rename_err)?;
            fs::remove_file(source)
        }
    }
}
