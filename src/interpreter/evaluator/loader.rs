use std::{fs, rc::Rc};

use crate::{
    ast::{Expression, FunctionCall, Item, Program, UseDirective},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        lexer::tokenize,
        parser::core::parse_program,
        value::{Value, to_bytes},
    },
    util::num::size_to_int,
};

impl Context {
    /// Runs a program given as source text.
    ///
    /// The pipeline is: tokenize, parse, process the top-level items
    /// (defining functions and resolving `use` directives), then invoke
    /// `main` when it is defined.
    ///
    /// # Parameters
    /// - `source`: The program text.
    /// - `args`: Command-line arguments forwarded to `main`.
    ///
    /// # Errors
    /// Any lexing, parsing, or runtime error, boxed.
    ///
    /// ## Example
    /// ```
    /// use arrai::interpreter::evaluator::core::Context;
    ///
    /// let mut context = Context::new();
    /// let result = context.run_source("fn main(_: [+]) -> [+] { }", &[]);
    ///
    /// assert!(result.is_ok());
    /// ```
    pub fn run_source(&mut self,
                      source: &str,
                      args: &[String])
                      -> Result<(), Box<dyn std::error::Error>> {
        let tokens = tokenize(source)?;
        let program = parse_program(&tokens)?;
        self.process_items(&program)?;
        self.call_main(args)?;
        Ok(())
    }

    /// Runs a program from a file on disk.
    ///
    /// # Errors
    /// A [`RuntimeError::FileOpen`] when the file cannot be read, plus
    /// everything [`Context::run_source`] can raise.
    pub fn run_file(&mut self,
                    path: &str,
                    args: &[String])
                    -> Result<(), Box<dyn std::error::Error>> {
        let source = fs::read_to_string(path).map_err(|_| {
                                                 RuntimeError::FileOpen { path: path.to_string(),
                                                                          line: 0, }
                                             })?;
        self.run_source(&source, args)
    }

    /// Processes the top-level items of a parsed program.
    ///
    /// Function definitions are bound in the root scope (first definition
    /// wins); `use` directives load their targets; bindings and calls at
    /// the top level are ignored.
    fn process_items(&mut self, program: &Program) -> Result<(), Box<dyn std::error::Error>> {
        for item in &program.items {
            match item {
                Item::Function(def) => {
                    self.root
                        .define(&def.name, Value::function(Rc::new(def.clone())));
                },
                Item::Use(directive) => self.process_use(directive)?,
                Item::Binding(_) | Item::Call(_) => {},
            }
        }
        Ok(())
    }

    /// Resolves and loads a `use` target.
    ///
    /// The target expression is evaluated in the root scope and rendered
    /// to a filename byte for byte. Each filename is loaded at most once
    /// per run; later directives naming it are skipped silently.
    fn process_use(&mut self, directive: &UseDirective) -> Result<(), Box<dyn std::error::Error>> {
        let root = Rc::clone(&self.root);
        let target = self.eval_array(&directive.target, &root, directive.line)?;
        let filename_bytes = to_bytes(target.as_ints(directive.line)?);
        let filename = String::from_utf8_lossy(&filename_bytes).into_owned();

        if self.loaded.contains(&filename) {
            return Ok(());
        }
        self.loaded.push(filename.clone());
        self.load_file(&filename, directive.line)
    }

    fn load_file(&mut self, path: &str, line: usize) -> Result<(), Box<dyn std::error::Error>> {
        let source = fs::read_to_string(path).map_err(|_| {
                                                 RuntimeError::FileOpen { path: path.to_string(),
                                                                          line }
                                             })?;
        let tokens = tokenize(&source)?;
        let program = parse_program(&tokens)?;
        self.process_items(&program)
    }

    /// Invokes `main`, when the loaded program defines it.
    ///
    /// `main` receives up to two arguments: a one-element array holding
    /// the count of forwarded arguments, and a flattened array carrying,
    /// for each argument, its byte length followed by its bytes. The list
    /// is truncated to `main`'s declared parameter count, so a `main`
    /// with fewer parameters simply receives a prefix.
    fn call_main(&mut self, args: &[String]) -> EvalResult<()> {
        if !self.root.has("main") {
            return Ok(());
        }

        let param_count = self.root
                              .get("main", 0)?
                              .as_function()
                              .map_or(2, |def| def.params.len());

        let argc = size_to_int(args.len(),
                               RuntimeError::InvalidArgument { details:
                                                                   "too many arguments".to_string(),
                                                               line: 0, })?;

        let mut flattened = Vec::new();
        for arg in args {
            let length = size_to_int(arg.len(),
                                     RuntimeError::InvalidArgument { details:
                                                                         "argument too long"
                                                                             .to_string(),
                                                                     line: 0, })?;
            flattened.push(length);
            flattened.extend(arg.bytes().map(i32::from));
        }

        let mut arguments = vec![Expression::from_ints(vec![argc], 0),
                                 Expression::from_ints(flattened, 0)];
        arguments.truncate(param_count);

        let call = FunctionCall { name: "main".to_string(),
                                  arguments,
                                  line: 0 };
        let root = Rc::clone(&self.root);
        self.eval_call(&call, &root)?;
        Ok(())
    }
}
