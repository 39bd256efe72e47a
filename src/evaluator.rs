use crate::ast::{BlockStatement, Expression, Identifier, InfixOp, PrefixOp, Program, Statement};
use crate::builtins;
use crate::environment::{Env, Environment};
use crate::error::{RuntimeError, Span};
use crate::object::{Function, HashObject, HashPair, Object, NULL};
use crate::stack::ensure_sufficient_stack;
use std::io::{self, Write};
use std::rc::Rc;
use tracing::{debug, trace};

/// Why evaluation stopped before producing a value. Both arms travel up through
/// `?` until something handles them: `Return` at the nearest function call (or
/// the top of the program), `Error` only at the top.
#[derive(Debug)]
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

pub type EvalResult<T = Object> = Result<T, Unwind>;

fn fail<T>(message: String, span: Span) -> EvalResult<T> {
    Err(Unwind::Error(RuntimeError::new(message, span)))
}

#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Nested function calls allowed before evaluation fails.
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
        }
    }
}

/// Tree-walking evaluator. Holds the global scope, so reusing one evaluator
/// across programs keeps earlier `let` bindings alive; `puts` writes to
/// `output`.
pub struct Evaluator<W: Write = io::Stdout> {
    env: Env,
    output: W,
    config: EvalConfig,
    depth: usize,
}

impl Evaluator<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Evaluator<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Evaluator<W> {
    pub fn with_output(output: W) -> Self {
        Self {
            env: Environment::new().into_shared(),
            output,
            config: EvalConfig::default(),
            depth: 0,
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn environment(&self) -> &Env {
        &self.env
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs `program` in the global scope. `Ok(None)` means the program produced
    /// nothing to show (it was empty or ended with a `let`).
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn evaluate_program(&mut self, program: &Program) -> Result<Option<Object>, RuntimeError> {
        let env = Rc::clone(&self.env);
        let mut result = None;

        for statement in &program.statements {
            match self.evaluate_statement(statement, &env) {
                Ok(value) => result = value,
                Err(Unwind::Return(value)) => return Ok(Some(value)),
                Err(Unwind::Error(error)) => {
                    debug!(message = %error.message, "evaluation failed");
                    return Err(error);
                }
            }
        }

        Ok(result)
    }

    fn evaluate_statement(&mut self, statement: &Statement, env: &Env) -> EvalResult<Option<Object>> {
        match statement {
            Statement::Let { name, value, .. } => {
                let value = self.evaluate_expression(value, env)?;
                env.borrow_mut().set(name.value.as_str(), value);
                Ok(None)
            }
            Statement::Return { value, .. } => {
                let value = self.evaluate_expression(value, env)?;
                Err(Unwind::Return(value))
            }
            Statement::Expression { expression, .. } => {
                self.evaluate_expression(expression, env).map(Some)
            }
        }
    }

    fn evaluate_block(&mut self, block: &BlockStatement, env: &Env) -> EvalResult {
        let mut result = NULL;
        for statement in &block.statements {
            result = self.evaluate_statement(statement, env)?.unwrap_or(NULL);
        }
        Ok(result)
    }

    /// Each language-level call nests several host frames, so the stack is
    /// grown here rather than relying on the call-depth ceiling alone.
    pub fn evaluate_expression(&mut self, expression: &Expression, env: &Env) -> EvalResult {
        ensure_sufficient_stack(|| self.evaluate_expression_node(expression, env))
    }

    fn evaluate_expression_node(&mut self, expression: &Expression, env: &Env) -> EvalResult {
        match expression {
            Expression::Identifier(identifier) => self.evaluate_identifier(identifier, env),
            Expression::IntegerLiteral { value, .. } => Ok(Object::Integer(*value)),
            Expression::StringLiteral { value, .. } => Ok(Object::String(value.clone())),
            Expression::Boolean { value, .. } => Ok(Object::native_bool(*value)),
            Expression::Prefix {
                token,
                operator,
                right,
            } => {
                let right = self.evaluate_expression(right, env)?;
                self.evaluate_prefix(*operator, right, token.span)
            }
            Expression::Infix {
                token,
                operator,
                left,
                right,
            } => {
                let left = self.evaluate_expression(left, env)?;
                let right = self.evaluate_expression(right, env)?;
                self.evaluate_infix(*operator, left, right, token.span)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                let condition = self.evaluate_expression(condition, env)?;
                if condition.is_truthy() {
                    self.evaluate_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.evaluate_block(alternative, env)
                } else {
                    Ok(NULL)
                }
            }
            Expression::FunctionLiteral(literal) => Ok(Object::Function(Rc::new(Function {
                literal: Rc::clone(literal),
                env: Rc::clone(env),
            }))),
            Expression::Call {
                token,
                function,
                arguments,
            } => {
                let function = self.evaluate_expression(function, env)?;
                let arguments = self.evaluate_expressions(arguments, env)?;
                self.apply_function(function, arguments, token.span)
            }
            Expression::ArrayLiteral { elements, .. } => {
                let elements = self.evaluate_expressions(elements, env)?;
                Ok(Object::Array(Rc::new(elements)))
            }
            Expression::Index { token, left, index } => {
                let left = self.evaluate_expression(left, env)?;
                let index = self.evaluate_expression(index, env)?;
                self.evaluate_index(left, index, token.span)
            }
            Expression::HashLiteral { pairs, .. } => self.evaluate_hash_literal(pairs, env),
        }
    }

    /// Left to right, stopping at the first failure.
    fn evaluate_expressions(&mut self, expressions: &[Expression], env: &Env) -> EvalResult<Vec<Object>> {
        expressions
            .iter()
            .map(|expression| self.evaluate_expression(expression, env))
            .collect()
    }

    fn evaluate_identifier(&self, identifier: &Identifier, env: &Env) -> EvalResult {
        if let Some(value) = env.borrow().get(&identifier.value) {
            return Ok(value);
        }
        if let Some(builtin) = builtins::lookup(&identifier.value) {
            return Ok(Object::Builtin(builtin));
        }
        fail(
            format!("identifier not found: {}", identifier.value),
            identifier.token.span,
        )
    }

    fn evaluate_prefix(&self, operator: PrefixOp, right: Object, span: Span) -> EvalResult {
        match operator {
            PrefixOp::Not => Ok(Object::native_bool(!right.is_truthy())),
            PrefixOp::Negate => match right {
                Object::Integer(n) => Ok(Object::Integer(n.wrapping_neg())),
                other => fail(
                    format!("unknown operator: -{}", other.object_type()),
                    span,
                ),
            },
        }
    }

    fn evaluate_infix(&self, operator: InfixOp, left: Object, right: Object, span: Span) -> EvalResult {
        match (&left, &right) {
            (Object::Integer(l), Object::Integer(r)) => {
                self.evaluate_integer_infix(operator, *l, *r, span)
            }
            (Object::String(l), Object::String(r)) => match operator {
                InfixOp::Add => Ok(Object::String(format!("{}{}", l, r))),
                _ => fail(
                    format!("unknown operator: STRING {} STRING", operator),
                    span,
                ),
            },
            _ => match operator {
                InfixOp::Equal => Ok(Object::native_bool(left.is_identical(&right))),
                InfixOp::NotEqual => Ok(Object::native_bool(!left.is_identical(&right))),
                _ if left.object_type() != right.object_type() => fail(
                    format!(
                        "type mismatch: {} {} {}",
                        left.object_type(),
                        operator,
                        right.object_type()
                    ),
                    span,
                ),
                _ => fail(
                    format!(
                        "unknown operator: {} {} {}",
                        left.object_type(),
                        operator,
                        right.object_type()
                    ),
                    span,
                ),
            },
        }
    }

    fn evaluate_integer_infix(&self, operator: InfixOp, left: i64, right: i64, span: Span) -> EvalResult {
        let value = match operator {
            InfixOp::Add => Object::Integer(left.wrapping_add(right)),
            InfixOp::Subtract => Object::Integer(left.wrapping_sub(right)),
            InfixOp::Multiply => Object::Integer(left.wrapping_mul(right)),
            InfixOp::Divide => {
                if right == 0 {
                    return fail("division by zero".to_string(), span);
                }
                Object::Integer(left.wrapping_div(right))
            }
            InfixOp::Less => Object::native_bool(left < right),
            InfixOp::Greater => Object::native_bool(left > right),
            InfixOp::Equal => Object::native_bool(left == right),
            InfixOp::NotEqual => Object::native_bool(left != right),
        };
        Ok(value)
    }

    fn apply_function(&mut self, function: Object, arguments: Vec<Object>, span: Span) -> EvalResult {
        match function {
            Object::Function(function) => {
                let parameters = &function.literal.parameters;
                if parameters.len() != arguments.len() {
                    return fail(
                        format!(
                            "wrong number of arguments: want={}, got={}",
                            parameters.len(),
                            arguments.len()
                        ),
                        span,
                    );
                }
                if self.depth >= self.config.max_call_depth {
                    return fail(
                        format!(
                            "maximum call depth exceeded ({})",
                            self.config.max_call_depth
                        ),
                        span,
                    );
                }

                let mut scope = Environment::with_enclosing(Rc::clone(&function.env));
                for (parameter, argument) in parameters.iter().zip(arguments) {
                    scope.set(parameter.value.as_str(), argument);
                }
                let scope = scope.into_shared();

                trace!(depth = self.depth, arity = parameters.len(), "calling function");
                self.depth += 1;
                let result = self.evaluate_block(&function.literal.body, &scope);
                self.depth -= 1;

                match result {
                    Err(Unwind::Return(value)) => Ok(value),
                    other => other,
                }
            }
            Object::Builtin(builtin) => {
                trace!(name = builtin.name, "calling builtin");
                (builtin.func)(&arguments, &mut self.output)
                    .map_err(|message| Unwind::Error(RuntimeError::new(message, span)))
            }
            other => fail(format!("not a function: {}", other.object_type()), span),
        }
    }

    fn evaluate_index(&self, left: Object, index: Object, span: Span) -> EvalResult {
        match (&left, &index) {
            (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
                .ok()
                .and_then(|i| elements.get(i))
                .cloned()
                .unwrap_or(NULL)),
            (Object::Hash(hash), _) => {
                let Some(key) = index.hash_key() else {
                    return fail(
                        format!("unusable as hash key: {}", index.object_type()),
                        span,
                    );
                };
                Ok(hash.get(&key).map(|pair| pair.value.clone()).unwrap_or(NULL))
            }
            _ => fail(
                format!(
                    "index operator not supported: {}[{}]",
                    left.object_type(),
                    index.object_type()
                ),
                span,
            ),
        }
    }

    fn evaluate_hash_literal(&mut self, pairs: &[(Expression, Expression)], env: &Env) -> EvalResult {
        let mut hash = HashObject::new();

        for (key_expression, value_expression) in pairs {
            let key = self.evaluate_expression(key_expression, env)?;
            let Some(hash_key) = key.hash_key() else {
                return fail(
                    format!("unusable as hash key: {}", key.object_type()),
                    key_expression.span(),
                );
            };
            let value = self.evaluate_expression(value_expression, env)?;
            hash.insert(hash_key, HashPair { key, value });
        }

        Ok(Object::Hash(Rc::new(hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Result<Option<Object>, RuntimeError> {
        let (program, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
        Evaluator::with_output(io::sink()).evaluate_program(&program)
    }

    fn value(source: &str) -> Object {
        match run(source) {
            Ok(Some(value)) => value,
            other => panic!("{:?} produced {:?}", source, other),
        }
    }

    fn error(source: &str) -> String {
        match run(source) {
            Err(error) => error.message,
            other => panic!("{:?} should fail, got {:?}", source, other),
        }
    }

    #[test]
    fn integer_expressions() {
        let cases = [
            ("5", 5),
            ("-10", -10),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("5 * 2 + 10", 20),
            ("5 + 2 * 10", 25),
            ("50 / 2 * 2 + 10", 60),
            ("2 * (5 + 10)", 30),
            ("3 * (3 * 3) + 10", 37),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
            ("7 / 2", 3),
        ];
        for (input, expected) in cases {
            assert_eq!(value(input), Object::Integer(expected), "input: {}", input);
        }
    }

    #[test]
    fn boolean_expressions() {
        let cases = [
            ("true", true),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("true == true", true),
            ("true != false", true),
            ("(1 < 2) == true", true),
            ("(1 > 2) == true", false),
            ("!true", false),
            ("!!true", true),
            ("!5", false),
            ("!!5", true),
            ("1 == true", false),
        ];
        for (input, expected) in cases {
            assert_eq!(value(input), Object::Boolean(expected), "input: {}", input);
        }
    }

    #[test]
    fn if_else_expressions() {
        assert_eq!(value("if (true) { 10 }"), Object::Integer(10));
        assert_eq!(value("if (false) { 10 }"), NULL);
        assert_eq!(value("if (1) { 10 }"), Object::Integer(10));
        assert_eq!(value("if (0) { 10 }"), Object::Integer(10));
        assert_eq!(value("if (1 < 2) { 10 }"), Object::Integer(10));
        assert_eq!(value("if (1 > 2) { 10 }"), NULL);
        assert_eq!(value("if (1 > 2) { 10 } else { 20 }"), Object::Integer(20));
        assert_eq!(value("if (true) { }"), NULL);
    }

    #[test]
    fn return_statements() {
        assert_eq!(value("return 10;"), Object::Integer(10));
        assert_eq!(value("return 10; 9;"), Object::Integer(10));
        assert_eq!(value("9; return 2 * 5; 9;"), Object::Integer(10));
        assert_eq!(
            value("if (10 > 1) { if (10 > 1) { return 10; } return 1; }"),
            Object::Integer(10)
        );
    }

    #[test]
    fn error_messages() {
        let cases = [
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "identifier not found: foobar"),
            ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
            (
                "{\"name\": \"Monkey\"}[fn(x) { x }];",
                "unusable as hash key: FUNCTION",
            ),
            ("{[1]: 2}", "unusable as hash key: ARRAY"),
            ("1 / 0", "division by zero"),
            ("5(1)", "not a function: INTEGER"),
            ("[1, 2][\"a\"]", "index operator not supported: ARRAY[STRING]"),
            ("1[0]", "index operator not supported: INTEGER[INTEGER]"),
        ];
        for (input, expected) in cases {
            assert_eq!(error(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn let_statements() {
        assert_eq!(value("let a = 5; a;"), Object::Integer(5));
        assert_eq!(value("let a = 5 * 5; a;"), Object::Integer(25));
        assert_eq!(value("let a = 5; let b = a; b;"), Object::Integer(5));
        assert_eq!(
            value("let a = 5; let b = a; let c = a + b + 5; c;"),
            Object::Integer(15)
        );
    }

    #[test]
    fn let_yields_nothing_at_top_level() {
        assert_eq!(run("let a = 5;"), Ok(None));
        assert_eq!(run(""), Ok(None));
    }

    #[test]
    fn failed_let_does_not_bind() {
        let (program, _) = parse("let a = b;");
        let mut evaluator = Evaluator::with_output(io::sink());
        assert!(evaluator.evaluate_program(&program).is_err());
        assert_eq!(evaluator.environment().borrow().get("a"), None);
    }

    #[test]
    fn function_object() {
        match value("fn(x) { x + 2; };") {
            Object::Function(function) => {
                assert_eq!(function.literal.parameters.len(), 1);
                assert_eq!(function.literal.parameters[0].value, "x");
                assert_eq!(function.literal.body.to_string(), "(x + 2)");
            }
            other => panic!("expected function, got {:?}", other),
        }
        assert_eq!(value("fn(x, y) { x + y }").inspect(), "fn(x, y) { (x + y) }");
    }

    #[test]
    fn function_application() {
        let cases = [
            ("let identity = fn(x) { x; }; identity(5);", 5),
            ("let identity = fn(x) { return x; }; identity(5);", 5),
            ("let double = fn(x) { x * 2; }; double(5);", 10),
            ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
            ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
            ("fn(x) { x; }(5)", 5),
        ];
        for (input, expected) in cases {
            assert_eq!(value(input), Object::Integer(expected), "input: {}", input);
        }
    }

    #[test]
    fn return_stops_only_at_call_boundary() {
        let source = "let f = fn() { if (true) { return 1; } 2 }; f() + 10";
        assert_eq!(value(source), Object::Integer(11));
    }

    #[test]
    fn closures() {
        let source = "
            let newAdder = fn(x) { fn(y) { x + y }; };
            let addTwo = newAdder(2);
            addTwo(3);
        ";
        assert_eq!(value(source), Object::Integer(5));
    }

    #[test]
    fn closures_use_definition_scope() {
        let source = "
            let x = 1;
            let getX = fn() { x };
            let shadow = fn(x) { getX() };
            shadow(100);
        ";
        assert_eq!(value(source), Object::Integer(1));
    }

    #[test]
    fn recursion() {
        let source = "
            let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } };
            fib(15);
        ";
        assert_eq!(value(source), Object::Integer(610));
    }

    #[test]
    fn arity_mismatch() {
        assert_eq!(
            error("let add = fn(x, y) { x + y }; add(1);"),
            "wrong number of arguments: want=2, got=1"
        );
    }

    #[test]
    fn inner_return_stays_inside_inner_call() {
        let source = "let f = fn() { let g = fn() { return 1; }; g(); 2 }; f()";
        assert_eq!(value(source), Object::Integer(2));
    }

    /// Runs `source` with the default config on a thread with an ordinary
    /// 8 MiB main-thread stack.
    fn run_on_main_sized_stack(source: &'static str) -> Result<Option<String>, String> {
        std::thread::Builder::new()
            .stack_size(8 * 1024 * 1024)
            .spawn(move || {
                let (program, errors) = parse(source);
                assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
                Evaluator::with_output(io::sink())
                    .evaluate_program(&program)
                    .map(|value| value.map(|v| v.inspect()))
                    .map_err(|error| error.message)
            })
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn deep_recursion_below_default_ceiling() {
        let source = "let f = fn(n) { if (n == 0) { 0 } else { 1 + f(n - 1) } }; f(990);";
        assert_eq!(run_on_main_sized_stack(source), Ok(Some("990".to_string())));
    }

    #[test]
    fn default_ceiling_is_reached_before_the_stack_runs_out() {
        let source = "let f = fn(n) { if (n == 0) { 0 } else { 1 + f(n - 1) } }; f(5000);";
        assert_eq!(
            run_on_main_sized_stack(source),
            Err("maximum call depth exceeded (1000)".to_string())
        );
    }

    #[test]
    fn call_depth_is_bounded() {
        let (program, _) = parse("let f = fn(n) { f(n + 1) }; f(0);");
        let mut evaluator =
            Evaluator::with_output(io::sink()).with_config(EvalConfig { max_call_depth: 50 });
        let error = evaluator.evaluate_program(&program).unwrap_err();
        assert_eq!(error.message, "maximum call depth exceeded (50)");
    }

    #[test]
    fn argument_errors_abort_the_call() {
        assert_eq!(
            error("let f = fn(a, b) { a }; f(1, missing, 3 + true)"),
            "identifier not found: missing"
        );
    }

    #[test]
    fn strings() {
        assert_eq!(value("\"Hello World!\""), Object::String("Hello World!".into()));
        assert_eq!(
            value("\"Hello\" + \" \" + \"World!\""),
            Object::String("Hello World!".into())
        );
    }

    #[test]
    fn builtin_calls() {
        assert_eq!(value("len(\"hello world\")"), Object::Integer(11));
        assert_eq!(value("len([1, 2, 3])"), Object::Integer(3));
        assert_eq!(
            error("len(1)"),
            "argument to `len` not supported, got INTEGER"
        );
        assert_eq!(value("let len = fn(x) { 42 }; len(\"a\")"), Object::Integer(42));
        assert_eq!(value("len").inspect(), "builtin function");
    }

    #[test]
    fn puts_goes_to_evaluator_output() {
        let (program, _) = parse("puts(\"hi\", 2)");
        let mut evaluator = Evaluator::with_output(Vec::new());
        assert_eq!(evaluator.evaluate_program(&program), Ok(Some(NULL)));
        assert_eq!(String::from_utf8(evaluator.into_output()).unwrap(), "hi\n2\n");
    }

    #[test]
    fn array_literals_and_indexing() {
        assert_eq!(value("[1, 2 * 2, 3 + 3]").inspect(), "[1,4,6]");
        let cases = [
            ("[1, 2, 3][0]", Object::Integer(1)),
            ("[1, 2, 3][1]", Object::Integer(2)),
            ("[1, 2, 3][2]", Object::Integer(3)),
            ("let i = 0; [1][i];", Object::Integer(1)),
            ("[1, 2, 3][1 + 1];", Object::Integer(3)),
            ("let myArray = [1, 2, 3]; myArray[2];", Object::Integer(3)),
            (
                "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
                Object::Integer(6),
            ),
            ("[1, 2, 3][3]", NULL),
            ("[1, 2, 3][10]", NULL),
            ("[1, 2, 3][-1]", NULL),
        ];
        for (input, expected) in cases {
            assert_eq!(value(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn hash_literals() {
        let source = r#"
            let two = "two";
            {
                "one": 10 - 9,
                two: 1 + 1,
                "thr" + "ee": 6 / 2,
                4: 4,
                true: 5,
                false: 6
            }
        "#;
        assert_eq!(
            value(source).inspect(),
            "{one: 1,two: 2,three: 3,4: 4,true: 5,false: 6}"
        );
    }

    #[test]
    fn hash_duplicate_keys_last_wins() {
        assert_eq!(value("{\"a\": 1, \"a\": 2}[\"a\"]"), Object::Integer(2));
        assert_eq!(value("{\"a\": 1, \"a\": 2}").inspect(), "{a: 2}");
    }

    #[test]
    fn hash_indexing() {
        let cases = [
            ("{\"foo\": 5}[\"foo\"]", Object::Integer(5)),
            ("{\"foo\": 5}[\"bar\"]", NULL),
            ("let key = \"foo\"; {\"foo\": 5}[key]", Object::Integer(5)),
            ("{}[\"foo\"]", NULL),
            ("{5: 5}[5]", Object::Integer(5)),
            ("{true: 5}[true]", Object::Integer(5)),
            ("{false: 5}[false]", Object::Integer(5)),
            ("{\"one\": 1}[\"one\"]", Object::Integer(1)),
            ("{\"one\": 1}[\"two\"]", NULL),
        ];
        for (input, expected) in cases {
            assert_eq!(value(input), expected, "input: {}", input);
        }
        assert!(error("{\"a\": 1}[[1]]").contains("unusable as hash key"));
    }

    #[test]
    fn identity_equality_for_containers() {
        assert_eq!(value("let a = [1]; a == a"), Object::Boolean(true));
        assert_eq!(value("[1] == [1]"), Object::Boolean(false));
        assert_eq!(value("let f = fn() { 1 }; f != f"), Object::Boolean(false));
    }

    #[test]
    fn errors_carry_the_operator_span() {
        let (program, _) = parse("1 +\ntrue");
        let error = Evaluator::with_output(io::sink())
            .evaluate_program(&program)
            .unwrap_err();
        assert_eq!(error.span, Span::new(2, 3));
    }
}
