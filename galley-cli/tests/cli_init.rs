use assert_cmd::Command;
use std::fs;
use tempfile::tempdir;

fn galley() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("galley").expect("galley binary")
}

#[test]
fn init_scaffolds_a_buildable_project() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    galley().current_dir(dir.path()).arg("init").assert().success();

    assert!(dir.path().join("galley.yml").exists());
    assert!(dir.path().join("docs/index.md").exists());
    assert!(dir.path().join("docs/guide/getting-started.md").exists());
    assert!(dir.path().join("static/css/galley.css").exists());

    // The scaffold builds as-is
    galley().current_dir(dir.path()).arg("build").assert().success();
    assert!(dir.path().join("public/index.html").exists());
    assert!(dir.path().join("public/guide/getting-started.html").exists());

    Ok(())
}

#[test]
fn init_into_named_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    galley()
        .current_dir(dir.path())
        .args(["init", "mysite"])
        .assert()
        .success();

    assert!(dir.path().join("mysite/galley.yml").exists());
    assert!(dir.path().join("mysite/docs/index.md").exists());

    Ok(())
}

#[test]
fn init_keeps_existing_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    galley().current_dir(dir.path()).arg("init").assert().success();
    fs::write(dir.path().join("galley.yml"), "# customized\n")?;

    galley().current_dir(dir.path()).arg("init").assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("galley.yml"))?,
        "# customized\n"
    );

    Ok(())
}
