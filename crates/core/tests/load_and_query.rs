//! End-to-end coverage of loading a genders file and querying it
//! through the public `Genders` handle.

use std::io::Write as _;
use std::sync::Mutex;

use genders_core::{ErrorCode, GendersError, Genders};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn write_genders(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("create temp genders file");
    f.write_all(contents.as_bytes()).expect("write genders file");
    f.flush().expect("flush genders file");
    f
}

#[test]
fn loads_and_enumerates_nodes_and_attrs() {
    let f = write_genders(
        "# cluster layout\n\
         node01 compute,rack=a1\n\
         node02 compute,rack=a1\n\
         master login,compute\n",
    );

    let mut g = Genders::new();
    g.load(Some(f.path())).unwrap();

    assert_eq!(g.getnumnodes().unwrap(), 3);
    assert_eq!(g.getnumattrs().unwrap(), 3); // compute, rack, login
    assert!(g.isnode(Some("node01")).unwrap());
    assert!(!g.isnode(Some("nope")).unwrap());
    assert!(g.isattr("rack").unwrap());
    assert!(!g.isattr("nonexistent").unwrap());
}

#[test]
fn hostlist_range_expands_to_individual_nodes() {
    let f = write_genders("node[01-03] compute\n");

    let mut g = Genders::new();
    g.load(Some(f.path())).unwrap();
    assert_eq!(g.getnumnodes().unwrap(), 3);

    let mut out = g.nodelist_create().unwrap();
    let n = g.getnodes(&mut out, None, None).unwrap();
    assert_eq!(n, 3);
    let names: Vec<&str> = out.iter().take(n).map(|s| s.as_deref().unwrap()).collect();
    assert_eq!(names, ["node01", "node02", "node03"]);
}

#[test]
fn percent_n_expands_against_the_queried_node() {
    let f = write_genders("node[01-02] home=/export/%n\n");

    let mut g = Genders::new();
    g.load(Some(f.path())).unwrap();

    let mut attrs = g.attrlist_create().unwrap();
    let mut vals = g.vallist_create().unwrap();
    let n = g.getattr(Some("node02"), &mut attrs, Some(&mut vals)).unwrap();
    assert_eq!(n, 1);
    assert_eq!(attrs[0].as_deref(), Some("home"));
    assert_eq!(vals[0].as_deref(), Some("/export/node02"));

    assert!(g.testattrval(Some("node02"), "home", Some("/export/node02")).unwrap());
    assert!(!g.testattrval(Some("node01"), "home", Some("/export/node02")).unwrap());
}

#[test]
fn duplicate_attribute_for_a_node_across_lines_fails_to_load() {
    let f = write_genders("node01 compute\nnode01 compute\n");

    let mut g = Genders::new();
    let err = g.load(Some(f.path())).unwrap_err();
    assert!(matches!(err, GendersError::Parse(_)));
    assert_eq!(g.errnum(), ErrorCode::Parse);
}

#[test]
fn lint_reports_diagnostics_without_failing_the_handle() {
    let f = write_genders(
        "node01 compute\n\
         node01 compute\n\
         node02 rack=a1\n",
    );

    let mut g = Genders::new();
    let mut report = Vec::new();
    let count = g.lint(Some(f.path()), &mut report).unwrap();
    assert_eq!(count, 1);
    let text = String::from_utf8(report).unwrap();
    assert!(text.contains("duplicate attributed listed"));
}

#[test]
fn query_on_unknown_node_reports_not_found() {
    let f = write_genders("node01 compute\n");

    let mut g = Genders::new();
    g.load(Some(f.path())).unwrap();

    let err = g.testattr(Some("ghost"), "compute", None).unwrap_err();
    assert!(matches!(err, GendersError::NotFound));
    assert_eq!(g.errnum(), ErrorCode::NotFound);
}

#[test]
fn queries_before_load_report_not_loaded() {
    let mut g = Genders::new();
    let err = g.getnumnodes().unwrap_err();
    assert!(matches!(err, GendersError::NotLoaded));
}

#[test]
fn destroyed_handle_reports_magic_on_every_call() {
    let mut g = Genders::new();
    g.destroy();
    assert_eq!(g.errnum(), ErrorCode::Magic);

    let err = g.getnumnodes().unwrap_err();
    assert!(matches!(err, GendersError::Magic));
    assert_eq!(g.errnum(), ErrorCode::Magic);
}

#[test]
fn reloading_an_already_loaded_handle_fails_with_isloaded() {
    let f = write_genders("node01 compute\n");

    let mut g = Genders::new();
    g.load(Some(f.path())).unwrap();

    let err = g.load(Some(f.path())).unwrap_err();
    assert!(matches!(err, GendersError::IsLoaded));
    assert_eq!(g.errnum(), ErrorCode::IsLoaded);
}

#[test]
fn load_path_none_honors_genders_file_env_override() {
    let _guard = ENV_LOCK.lock().unwrap();
    let f = write_genders("node01 compute\n");
    std::env::set_var("GENDERS_FILE", f.path());

    let mut g = Genders::new();
    g.load(None).unwrap();
    assert_eq!(g.getnumnodes().unwrap(), 1);

    std::env::remove_var("GENDERS_FILE");
}

#[test]
fn basic_load_and_enumerate_matches_worked_example() {
    let f = write_genders("n[1-2]  a=1,b=2\nn1      c=3\nn3      d\n");

    let mut g = Genders::new();
    g.load(Some(f.path())).unwrap();

    assert_eq!(g.getnumnodes().unwrap(), 3);
    assert_eq!(g.getnumattrs().unwrap(), 4);
    assert_eq!(g.getmaxattrs().unwrap(), 3); // n1 carries a, b, c

    let mut attrs = g.attrlist_create().unwrap();
    let mut vals = g.vallist_create().unwrap();
    let n = g.getattr(Some("n1"), &mut attrs, Some(&mut vals)).unwrap();
    assert_eq!(n, 3);
    assert_eq!(attrs[0].as_deref(), Some("a"));
    assert_eq!(vals[0].as_deref(), Some("1"));
    assert_eq!(attrs[2].as_deref(), Some("c"));
    assert_eq!(vals[2].as_deref(), Some("3"));

    let mut attrs3 = g.attrlist_create().unwrap();
    let n3 = g.getattr(Some("n3"), &mut attrs3, None).unwrap();
    assert_eq!(n3, 1);
    assert_eq!(attrs3[0].as_deref(), Some("d"));
}

#[test]
fn lint_aggregates_whitespace_in_attribute_list_errors() {
    let f = write_genders("n1 a b,c\nn2 d, e\nn3 f\n");

    let mut g = Genders::new();
    let mut report = Vec::new();
    let count = g.lint(Some(f.path()), &mut report).unwrap();
    assert_eq!(count, 2);
    let text = String::from_utf8(report).unwrap();
    assert_eq!(
        text.lines().count(),
        2,
        "expected exactly two diagnostic lines, got: {text}"
    );
    assert!(text.contains("white space in attribute list"));
}

#[test]
fn small_output_buffer_reports_overflow() {
    let f = write_genders("node[01-03] compute\n");

    let mut g = Genders::new();
    g.load(Some(f.path())).unwrap();

    let mut out = vec![Some(String::new())]; // only room for one of three nodes
    let err = g.getnodes(&mut out, None, None).unwrap_err();
    assert!(matches!(err, GendersError::Overflow));
}
