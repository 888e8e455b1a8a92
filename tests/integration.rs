use std::io::Write;

use ciinfo::config::Config;
use ciinfo::rules::{EnvRule, PrRule};
use ciinfo::{Info, Snapshot, Vendor, detect, detect_environ, vendor};

fn builtin_info(vars: &[(&str, &str)]) -> Info {
    let snapshot: Snapshot = vars.iter().copied().collect();
    detect(&snapshot, vendor::builtin())
}

macro_rules! detect_test {
    ($name:ident, $vars:expr, $id:expr, $pr:expr) => {
        #[test]
        fn $name() {
            let info = builtin_info($vars);
            assert_eq!(info.id, $id, "vars: {:?}", $vars);
            assert_eq!(info.is_pr, $pr, "vars: {:?}", $vars);
            assert!(info.is_ci, "vars: {:?}", $vars);
        }
    };
}

// ── Vendors without pull request ──

detect_test!(github_push, &[("GITHUB_ACTIONS", "true"), ("GITHUB_EVENT_NAME", "push")], "GITHUB_ACTIONS", false);
detect_test!(gitlab_branch, &[("GITLAB_CI", "true")], "GITLAB", false);
detect_test!(circle_branch, &[("CIRCLECI", "true")], "CIRCLE", false);
detect_test!(travis_branch, &[("TRAVIS", "true"), ("TRAVIS_PULL_REQUEST", "false")], "TRAVIS", false);
detect_test!(buildkite_branch, &[("BUILDKITE", "true"), ("BUILDKITE_PULL_REQUEST", "false")], "BUILDKITE", false);
detect_test!(azure_manual, &[("TF_BUILD", "True"), ("BUILD_REASON", "Manual")], "AZURE_PIPELINES", false);
detect_test!(codeship_by_name, &[("CI_NAME", "codeship")], "CODESHIP", false);
detect_test!(heroku_node_path, &[("NODE", "/app/.heroku/node/bin/node")], "HEROKU", false);
detect_test!(vercel_now_builder, &[("NOW_BUILDER", "1")], "VERCEL", false);
detect_test!(woodpecker_ci_value, &[("CI", "woodpecker")], "WOODPECKER", false);
detect_test!(teamcity, &[("TEAMCITY_VERSION", "2023.11")], "TEAMCITY", false);

// ── Pull requests ──

detect_test!(github_pr, &[("GITHUB_ACTIONS", "true"), ("GITHUB_EVENT_NAME", "pull_request")], "GITHUB_ACTIONS", true);
detect_test!(gitlab_mr, &[("GITLAB_CI", "true"), ("CI_MERGE_REQUEST_ID", "7")], "GITLAB", true);
detect_test!(travis_pr, &[("TRAVIS", "true"), ("TRAVIS_PULL_REQUEST", "42")], "TRAVIS", true);
detect_test!(azure_pr, &[("TF_BUILD", "True"), ("BUILD_REASON", "PullRequest")], "AZURE_PIPELINES", true);
detect_test!(codebuild_pr, &[("CODEBUILD_BUILD_ARN", "arn"), ("CODEBUILD_WEBHOOK_EVENT", "PULL_REQUEST_CREATED")], "CODEBUILD", true);
detect_test!(codefresh_pr, &[("CF_BUILD_ID", "1"), ("CF_PULL_REQUEST_ID", "3")], "CODEFRESH", true);
detect_test!(jenkins_change, &[("JENKINS_URL", "http://ci"), ("BUILD_ID", "9"), ("CHANGE_ID", "5")], "JENKINS", true);

// ── Edge cases ──

#[test]
fn jenkins_needs_both_variables() {
    let info = builtin_info(&[("JENKINS_URL", "http://ci")]);
    assert!(!info.is_vendor("JENKINS"));
    assert!(!info.is_ci);
}

#[test]
fn jenkins_build_id_alone_is_generic_ci() {
    let info = builtin_info(&[("BUILD_ID", "9")]);
    assert!(info.is_ci);
    assert_eq!(info.id, "");
    assert!(info.vendors.is_empty());
}

#[test]
fn ci_false_disables_everything() {
    let info = builtin_info(&[("CI", "false"), ("GITHUB_ACTIONS", "true")]);
    assert_eq!(info, Info::default());
    let info = builtin_info(&[("CI", "0"), ("GITLAB_CI", "true")]);
    assert_eq!(info, Info::default());
}

#[test]
fn plain_ci_true_is_generic() {
    let info = builtin_info(&[("CI", "true")]);
    assert!(info.is_ci);
    assert!(!info.is_pr);
    assert_eq!(info.name, "");
}

#[test]
fn empty_environment_is_not_ci() {
    let info = builtin_info(&[]);
    assert!(!info.is_ci);
    assert!(!info.is_pr);
}

#[test]
fn several_builtin_vendors_last_wins() {
    // TaskCluster needs RUN_ID, which is also a generic CI variable.
    let info = builtin_info(&[
        ("GITHUB_ACTIONS", "true"),
        ("TASK_ID", "t"),
        ("RUN_ID", "r"),
    ]);
    assert!(info.is_vendor("GITHUB_ACTIONS"));
    assert!(info.is_vendor("TASKCLUSTER"));
    assert_eq!(info.id, "TASKCLUSTER");
    assert_eq!(info.name, "TaskCluster");
}

#[test]
fn detect_environ_splits_entries() {
    let info = detect_environ(["GITLAB_CI=true", "MALFORMED", "CI_MERGE_REQUEST_ID=1=2"]);
    assert_eq!(info.id, "GITLAB");
    assert!(info.is_pr);
}

// ── Scenarios with hand-built tables ──

#[test]
fn two_custom_vendors() {
    let table = vec![
        Vendor::new("FirstCI", "FIRST", EnvRule::present("A")),
        Vendor::new("SecondCI", "SECOND", EnvRule::present("B")),
    ];
    let snapshot: Snapshot = [("A", "1"), ("B", "1")].into_iter().collect();
    let info = detect(&snapshot, &table);
    assert_eq!(info.name, "SecondCI");
    assert_eq!(info.id, "SECOND");
    assert_eq!(
        info.vendors.iter().map(String::as_str).collect::<Vec<_>>(),
        ["FIRST", "SECOND"]
    );
}

#[test]
fn custom_vendor_with_pr_rule() {
    let table = vec![
        Vendor::new("TestCI", "TEST", EnvRule::present("CI_VENDOR"))
            .with_pr(PrRule::present("PR_FLAG")),
    ];
    let snapshot: Snapshot = [("CI_VENDOR", "1"), ("PR_FLAG", "true")].into_iter().collect();
    assert!(detect(&snapshot, &table).is_pr);
}

// ── Vendor tables from files ──

#[test]
fn file_vendor_overrides_builtin_identity() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"name":"Internal Runner","constant":"INTERNAL","env":[{{"env":"GITHUB_ACTIONS"}},"RUNNER_POOL"],"pr":{{"env":"PR_NUMBER","ne":"none"}}}}]"#
    )
    .unwrap();

    let mut config = Config::default_config();
    config.vendors.files = vec![file.path().display().to_string()];
    let table = config.vendor_table().unwrap();

    let snapshot: Snapshot = [
        ("GITHUB_ACTIONS", "true"),
        ("GITHUB_EVENT_NAME", "pull_request"),
        ("RUNNER_POOL", "big"),
        ("PR_NUMBER", "none"),
    ]
    .into_iter()
    .collect();
    let info = detect(&snapshot, &table);
    assert_eq!(info.id, "INTERNAL");
    assert!(info.is_vendor("GITHUB_ACTIONS"));
    // The internal vendor's PR rule ran last and overrode GitHub's.
    assert!(!info.is_pr);
}

#[test]
fn malformed_vendor_file_fails_to_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"name":"X","constant":"X","env":{{"any":"NOT_A_LIST"}}}}]"#).unwrap();
    let err = vendor::load_table(file.path()).unwrap_err();
    assert!(matches!(err, ciinfo::Error::Parse { .. }));
}

#[test]
fn cached_info_is_consistent() {
    assert_eq!(ciinfo::info(), ciinfo::info());
}
