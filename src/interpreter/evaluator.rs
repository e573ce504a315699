/// The builtin function table: `print`, `read`, `getchar`, `clear`,
/// `range` and `exit`.
pub mod builtin;
/// The evaluation context and the statement/expression tree walk.
pub mod core;
/// The module loader: top-level item processing, `use` resolution with
/// its once-per-file guard, and the `main` invocation.
pub mod loader;
/// Postfix operations: slices and the `append`/`sqrt`/`size` methods.
pub mod method;
/// The scope chain: frames with weak parent links.
pub mod scope;
