use std::fs;
use std::path::Path;

use pipeline_builder_core::contribution::{write_contributions, ContributeError};
use pipeline_builder_core::descriptor::{load_descriptor, Descriptor, PackageSection};
use pipeline_builder_core::package_dependencies::contribute_package_dependencies;
use tempfile::tempdir;

fn descriptor_with_package(path: &Path) -> Descriptor {
    Descriptor {
        path: path.to_path_buf(),
        package: Some(PackageSection {
            repository: Some("gcr.io/example/java".into()),
        }),
    }
}

fn write_package_toml(dir: &Path, images: &[&str]) {
    let content: String = images
        .iter()
        .map(|image| format!("[[dependencies]]\nimage = \"{image}\"\n\n"))
        .collect();
    fs::write(dir.join("package.toml"), content).expect("Writing package.toml failed");
}

#[test]
fn test_no_package_section_contributes_nothing() {
    let dir = tempdir().unwrap();
    // Present but invalid: without a package section it must not even be read.
    fs::write(dir.path().join("package.toml"), "not [valid toml").unwrap();

    let descriptor = Descriptor {
        path: dir.path().to_path_buf(),
        package: None,
    };

    let contributions = contribute_package_dependencies(&descriptor).expect("no-op must succeed");
    assert!(contributions.is_empty());
}

#[test]
fn test_single_dependency_produces_update_workflow() {
    let dir = tempdir().unwrap();
    write_package_toml(dir.path(), &["registry.example.com/foo:1.2.3"]);

    let contributions =
        contribute_package_dependencies(&descriptor_with_package(dir.path())).expect("contribute");
    assert_eq!(contributions.len(), 1);

    let contribution = &contributions[0];
    assert_eq!(
        contribution.path,
        Path::new(".github/workflows/update-foo.yml")
    );

    let workflow: serde_yaml::Value = serde_yaml::from_str(&contribution.content).unwrap();
    assert_eq!(workflow["name"].as_str(), Some("Update foo"));
    assert_eq!(workflow["on"]["schedule"][0]["cron"].as_str(), Some("0 * * * *"));
    assert!(workflow["on"]["workflow_dispatch"].is_mapping());

    let job = &workflow["jobs"]["update"];
    assert_eq!(job["name"].as_str(), Some("Update Package Dependency"));
    assert_eq!(job["runs-on"][0].as_str(), Some("ubuntu-latest"));

    let steps = job["steps"].as_sequence().expect("steps");
    let labels: Vec<&str> = steps
        .iter()
        .map(|s| s["name"].as_str().or(s["uses"].as_str()).unwrap_or(""))
        .collect();
    assert_eq!(
        labels,
        vec![
            "actions/checkout@v2",
            "actions/setup-go@v2",
            "Install crane",
            "Install yj",
            "Install update-package-dependency",
            "GoogleCloudPlatform/github-actions/setup-gcloud@master",
            "Configure gcloud docker credentials",
            "Update Package Dependency",
            "peter-evans/create-pull-request@v3",
        ]
    );

    assert_eq!(steps[1]["with"]["go-version"].as_str(), Some("1.15"));
    assert_eq!(steps[3]["env"]["YJ_VERSION"].as_str(), Some("5.0.0"));
    assert_eq!(
        steps[5]["with"]["service_account_key"].as_str(),
        Some("${{ secrets.JAVA_GCLOUD_SERVICE_ACCOUNT_KEY }}")
    );
    assert_eq!(steps[6]["run"].as_str(), Some("gcloud auth configure-docker"));

    let update = &steps[7];
    assert_eq!(update["id"].as_str(), Some("package"));
    assert_eq!(
        update["env"]["DEPENDENCY"].as_str(),
        Some("registry.example.com/foo")
    );
    assert!(update["run"]
        .as_str()
        .unwrap()
        .contains("update-package-dependency"));

    let pr = &steps[8]["with"];
    assert_eq!(pr["branch"].as_str(), Some("update-package/foo"));
    assert_eq!(pr["signoff"].as_bool(), Some(true));
    assert_eq!(pr["delete-branch"].as_bool(), Some(true));
    assert_eq!(
        pr["labels"].as_str(),
        Some("semver:minor, type:dependency-upgrade")
    );
    assert_eq!(
        pr["commit-message"].as_str(),
        Some(
            "Bump registry.example.com/foo from ${{ steps.package.outputs.old-version }} to ${{ steps.package.outputs.new-version }}\n\n\
             Bumps registry.example.com/foo from ${{ steps.package.outputs.old-version }} to ${{ steps.package.outputs.new-version }}."
        )
    );
    assert!(pr["body"]
        .as_str()
        .unwrap()
        .starts_with("Bumps [`registry.example.com/foo`](https://registry.example.com/foo)"));
}

#[test]
fn test_one_contribution_per_dependency() {
    let dir = tempdir().unwrap();
    write_package_toml(
        dir.path(),
        &[
            "gcr.io/paketo-buildpacks/bellsoft-liberica:6.0.0",
            "gcr.io/paketo-buildpacks/maven:3.2.1",
            "localhost:5000/gradle:1.0.0",
        ],
    );

    let contributions =
        contribute_package_dependencies(&descriptor_with_package(dir.path())).expect("contribute");

    let paths: Vec<_> = contributions
        .iter()
        .map(|c| c.path.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        paths,
        vec![
            ".github/workflows/update-bellsoft-liberica.yml",
            ".github/workflows/update-maven.yml",
            ".github/workflows/update-gradle.yml",
        ]
    );
}

#[test]
fn test_untagged_dependency_fails_whole_pass() {
    let dir = tempdir().unwrap();
    write_package_toml(
        dir.path(),
        &["registry.example.com/bar:1.0.0", "registry.example.com/foo"],
    );

    let err = contribute_package_dependencies(&descriptor_with_package(dir.path()))
        .expect_err("untagged coordinate must fail");

    match err {
        ContributeError::ImageCoordinates(image) => assert_eq!(image, "registry.example.com/foo"),
        other => panic!("expected ImageCoordinates, got {other:?}"),
    }
}

#[test]
fn test_missing_or_malformed_package_toml_is_fatal() {
    let dir = tempdir().unwrap();

    let err = contribute_package_dependencies(&descriptor_with_package(dir.path()))
        .expect_err("missing package.toml must fail");
    assert!(matches!(err, ContributeError::Read { .. }));

    fs::write(dir.path().join("package.toml"), "[[dependencies]\nimage = ").unwrap();
    let err = contribute_package_dependencies(&descriptor_with_package(dir.path()))
        .expect_err("malformed package.toml must fail");
    match err {
        ContributeError::Decode { path, .. } => assert_eq!(path, dir.path().join("package.toml")),
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[test]
fn test_descriptor_to_written_workflows() {
    let dir = tempdir().unwrap();
    let github = dir.path().join(".github");
    fs::create_dir_all(&github).unwrap();
    fs::write(
        github.join("pipeline-descriptor.yml"),
        "package:\n  repository: gcr.io/example/java\n",
    )
    .unwrap();
    write_package_toml(dir.path(), &["gcr.io/paketo-buildpacks/maven:3.2.1"]);

    let descriptor = load_descriptor(github.join("pipeline-descriptor.yml")).expect("load descriptor");
    assert_eq!(descriptor.path, github.join(".."));

    let contributions = contribute_package_dependencies(&descriptor).expect("contribute");
    let written = write_contributions(&descriptor.path, &contributions).expect("write");

    assert_eq!(written.len(), 1);
    let content = fs::read_to_string(dir.path().join(".github/workflows/update-maven.yml"))
        .expect("workflow written");
    assert_eq!(content, contributions[0].content);
}
