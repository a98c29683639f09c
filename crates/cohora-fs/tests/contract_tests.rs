//! Both file systems must agree on observable behavior

use cohora_fs::{DirEntry, FileSystem, FsError, MemoryFs, WorkspaceFs};

async fn check_contract(fs: &dyn FileSystem) {
    fs.write("docs/guide.md", "# Guide").await.unwrap();
    fs.write("a.txt", "alpha").await.unwrap();
    fs.mkdir("empty/inner").await.unwrap();

    assert_eq!(
        fs.list(".").await.unwrap(),
        vec![
            DirEntry::file("a.txt"),
            DirEntry::dir("docs"),
            DirEntry::dir("empty"),
        ]
    );
    assert_eq!(fs.read("docs/guide.md").await.unwrap(), "# Guide");
    assert!(fs.exists("empty/inner").await);

    fs.write("a.txt", "beta").await.unwrap();
    assert_eq!(fs.read("a.txt").await.unwrap(), "beta");

    assert!(fs.read("missing.txt").await.unwrap_err().is_not_found());
    assert!(fs.remove("missing.txt").await.unwrap_err().is_not_found());
    assert!(matches!(
        fs.remove("docs").await,
        Err(FsError::IsADirectory { .. })
    ));
    assert!(matches!(
        fs.list("a.txt").await,
        Err(FsError::NotADirectory { .. })
    ));

    assert!(fs.write("../escape.txt", "x").await.unwrap_err().is_boundary_violation());
    assert!(fs.read("/etc/hosts").await.unwrap_err().is_boundary_violation());
    assert!(!fs.exists("../escape.txt").await);

    fs.remove("a.txt").await.unwrap();
    assert!(!fs.exists("a.txt").await);
}

#[tokio::test]
async fn memory_fs_contract() {
    check_contract(&MemoryFs::new()).await;
}

#[tokio::test]
async fn workspace_fs_contract() {
    let dir = tempfile::tempdir().unwrap();
    let fs = WorkspaceFs::open(dir.path()).await.unwrap();
    check_contract(&fs).await;
    assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
}
