/*!
 * Tests for file utilities and download naming
 */

use eduscript::file_utils::{DownloadKind, FileManager};

use crate::common;

#[test]
fn test_downloadFileName_withSpacedTopic_shouldUseUnderscores() {
    assert_eq!(
        FileManager::download_file_name("Black holes", DownloadKind::Script),
        "Black_holes_script.txt"
    );
    assert_eq!(
        FileManager::download_file_name("Black holes", DownloadKind::VideoScript),
        "Black_holes_video_script.txt"
    );
    assert_eq!(
        FileManager::download_file_name("Black holes", DownloadKind::TranslatedScript),
        "Black_holes_translated_script.txt"
    );
}

#[test]
fn test_downloadFileName_withAudio_shouldBeOutputMp3() {
    assert_eq!(FileManager::download_file_name("Anything", DownloadKind::Audio), "output.mp3");
}

#[test]
fn test_downloadFileName_withPathCharacters_shouldSanitize() {
    assert_eq!(
        FileManager::download_file_name("AC/DC: live?", DownloadKind::Script),
        "AC_DC__live__script.txt"
    );
    assert_eq!(FileManager::download_file_name("  ", DownloadKind::Script), "script.txt");
}

#[test]
fn test_downloadKind_fromStr_shouldAcceptBothSeparators() {
    assert_eq!("video-script".parse::<DownloadKind>().unwrap(), DownloadKind::VideoScript);
    assert_eq!("translated_script".parse::<DownloadKind>().unwrap(), DownloadKind::TranslatedScript);
    assert_eq!("audio".parse::<DownloadKind>().unwrap(), DownloadKind::Audio);
    assert!("slides".parse::<DownloadKind>().is_err());
}

#[test]
fn test_downloadKind_contentType_shouldMatchPayload() {
    assert_eq!(DownloadKind::Audio.content_type(), "audio/mpeg");
    assert!(DownloadKind::Script.content_type().starts_with("text/plain"));
}

#[test]
fn test_saveDownload_withNestedDir_shouldCreateItAndWrite() {
    let dir = common::create_temp_dir().unwrap();
    let target = dir.path().join("out").join("scripts");

    let path = FileManager::save_download(&target, "Tides", DownloadKind::Script, b"The moon.").unwrap();

    assert_eq!(path, target.join("Tides_script.txt"));
    assert_eq!(FileManager::read_bytes(&path).unwrap(), b"The moon.");
}

#[test]
fn test_stageTempFile_shouldBeRemovedOnDrop() {
    let staged = FileManager::stage_temp_file(b"ID3", ".mp3").unwrap();
    let path = staged.path().to_path_buf();
    assert!(path.exists());
    assert_eq!(FileManager::read_bytes(&path).unwrap(), b"ID3");

    drop(staged);
    assert!(!path.exists());
}
