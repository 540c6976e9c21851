//! Scope-model tests driven through the public analyzer surface.

use symdep::Analyzer;

fn expr_deps(code: &str) -> Vec<String> {
    Analyzer::new()
        .expression_dependencies(code)
        .unwrap()
        .into_iter()
        .map(|path| path.as_str().to_string())
        .collect()
}

fn single_deps(code: &str) -> Vec<String> {
    let records = Analyzer::new().parse_single(code).unwrap();
    assert_eq!(records.len(), 1);
    records[0]
        .dependencies
        .iter()
        .map(|path| path.as_str().to_string())
        .collect()
}

#[test]
fn comprehension_targets_never_leak() {
    assert_eq!(single_deps("x = [y for y in range(10) if y > a]"), vec!["range", "a"]);
    // Outside a comprehension the same name is a real dependency.
    assert_eq!(single_deps("x = y"), vec!["y"]);
}

#[test]
fn walrus_in_a_condition_binds_for_the_result_expression() {
    assert_eq!(
        expr_deps("[cleaned for line in lines if (cleaned := normalize(line))]"),
        vec!["lines", "normalize"]
    );
}

#[test]
fn lambda_default_reads_enclosing_scope() {
    assert_eq!(single_deps("f = lambda x, n=window: x * n"), vec!["window"]);
}

#[test]
fn nested_functions_stack_their_scopes() {
    let code = "def outer(a):\n    def inner(b):\n        return a + b + shared\n    return inner";
    // `inner` is a body local of `outer`; only `shared` is external.
    assert_eq!(single_deps(code), vec!["shared"]);
}

#[test]
fn method_parameters_do_not_leak_into_class_scope() {
    let code = "class Greeter:\n    greeting = prefix\n    def greet(self, name):\n        return self.greeting + name + suffix";
    assert_eq!(single_deps(code), vec!["prefix", "suffix"]);
}

#[test]
fn function_decorator_and_default_use_enclosing_scope() {
    let code = "@register\ndef handler(event, retries=DEFAULT_RETRIES):\n    return dispatch(event, retries)";
    assert_eq!(single_deps(code), vec!["register", "DEFAULT_RETRIES", "dispatch"]);
}

#[test]
fn class_keyword_arguments_use_enclosing_scope() {
    let code = "class Plugin(Base, metaclass=Registry):\n    name = PLUGIN_NAME";
    assert_eq!(single_deps(code), vec!["Base", "Registry", "PLUGIN_NAME"]);
}

#[test]
fn initial_bindings_hold_at_every_depth() {
    let analyzer = Analyzer::new().with_builtins(["len", "range"]);
    let records = analyzer
        .parse_single("def f(xs):\n    return [len(x) for x in xs if x in table]")
        .unwrap();
    let deps: Vec<_> = records[0].dependencies.iter().map(|p| p.as_str()).collect();
    assert_eq!(deps, vec!["table"]);
}

#[test]
fn call_severed_chains_stop_at_the_call() {
    assert_eq!(
        expr_deps("client.session().headers.update(extra)"),
        vec!["client", "client.session", "extra"]
    );
}

#[test]
fn conditional_expression_visits_condition_first() {
    assert_eq!(expr_deps("primary if ready else backup"), vec!["ready", "primary", "backup"]);
}

#[test]
fn fstring_reads_are_found() {
    assert_eq!(expr_deps("f'{user.name} has {count} items'"), vec!["user", "user.name", "count"]);
}
