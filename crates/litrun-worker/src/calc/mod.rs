// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! A small reference engine for a C++-flavoured statement language.
//!
//! `calc` is not a compiler. It understands just enough of iostream-style
//! C++ (declarations, assignments, `std::cout` chains, `throw` and
//! `std::exit`) to drive the worker end to end. Like a real interpreter it
//! keeps declared names between blocks and resolves every name in a block
//! before running any of it.

mod lexer;
mod parser;
mod value;

use std::collections::{HashMap, HashSet};

use crate::engine::{Captured, Engine, EngineError, FaultMode, RaisedFault};

use lexer::tokenize;
use parser::{BinOp, Expr, Item, Parser, Stmt, Stream, Type, UnOp};
use value::{Number, Value};

/// Headers `define` accepts.
const KNOWN_HEADERS: &[&str] = &[
    "iostream", "iomanip", "cmath", "string", "stdexcept", "cstdlib", "vector", "sstream",
    "limits",
];

/// Exception types `throw` accepts.
const EXCEPTION_TYPES: &[&str] = &[
    "std::invalid_argument",
    "std::domain_error",
    "std::length_error",
    "std::out_of_range",
    "std::logic_error",
    "std::runtime_error",
    "std::range_error",
    "std::overflow_error",
    "std::underflow_error",
];

const FUNCTIONS: &[&str] = &["std::sqrt", "std::pow", "std::abs"];

const DEFAULT_PRECISION: usize = 6;

/// Past this many significant digits a double prints nothing but padding,
/// which `%g` trims anyway.
const MAX_PRECISION: usize = 1024;

#[derive(Debug, Clone)]
struct Binding {
    ty: Type,
    value: Value,
}

fn error(message: impl std::fmt::Display) -> RaisedFault {
    RaisedFault::Other(format!("error: {}", message))
}

/// The `calc` engine. Declared names and stream state live as long as the
/// engine does.
#[derive(Debug)]
pub struct CalcEngine {
    env: HashMap<String, Binding>,
    precision: usize,
    boolalpha: bool,
    mode: FaultMode,
}

impl Default for CalcEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CalcEngine {
    pub fn new() -> Self {
        Self {
            env: HashMap::new(),
            precision: DEFAULT_PRECISION,
            boolalpha: false,
            mode: FaultMode::default(),
        }
    }

    /// Whether `name` has been declared by an earlier block.
    pub fn is_declared(&self, name: &str) -> bool {
        self.env.contains_key(name)
    }

    fn run_block(&mut self, stmts: &[Stmt], out: &mut Captured) -> Result<(), RaisedFault> {
        for stmt in stmts {
            self.run_stmt(stmt, out)?;
        }
        Ok(())
    }

    fn run_stmt(&mut self, stmt: &Stmt, out: &mut Captured) -> Result<(), RaisedFault> {
        match stmt {
            Stmt::Declare { ty, name, init } => {
                let value = match init {
                    Some(init) => coerce(*ty, self.eval(init)?)?,
                    None => zero(*ty),
                };
                let ty = match ty {
                    Type::Auto => deduce(&value),
                    ty => *ty,
                };
                self.env.insert(name.clone(), Binding { ty, value });
            }
            Stmt::Assign { name, op, value } => {
                let rhs = self.eval(value)?;
                let binding = self
                    .env
                    .get(name)
                    .ok_or_else(|| undeclared(name))?;
                let ty = binding.ty;
                let updated = match op {
                    Some(op) => self.binary(*op, binding.value.clone(), rhs)?,
                    None => rhs,
                };
                let updated = coerce(ty, updated)?;
                if let Some(binding) = self.env.get_mut(name) {
                    binding.value = updated;
                }
            }
            Stmt::Print { stream, items } => {
                let buffer = match stream {
                    Stream::Out => &mut out.stdout,
                    Stream::Err => &mut out.stderr,
                };
                for item in items {
                    match item {
                        Item::Value(expr) => {
                            let value = self.eval(expr)?;
                            buffer.push_str(&value.render(self.precision, self.boolalpha));
                        }
                        Item::Endl => buffer.push('\n'),
                        Item::BoolAlpha(on) => self.boolalpha = *on,
                        Item::Precision(expr) => {
                            let n = integer(self.eval(expr)?, "std::setprecision")?;
                            self.precision = usize::try_from(n)
                                .map(|n| n.min(MAX_PRECISION))
                                .unwrap_or(DEFAULT_PRECISION);
                        }
                    }
                }
            }
            Stmt::Throw { type_name, message } => {
                if !EXCEPTION_TYPES.contains(&type_name.as_str()) {
                    return Err(error(format!("unknown type name '{}'", type_name)));
                }
                let what = match self.eval(message)? {
                    Value::Str(s) => s,
                    other => {
                        return Err(error(format!(
                            "no matching constructor for initialization of '{}' from '{}'",
                            type_name,
                            other.type_name()
                        )))
                    }
                };
                return Err(RaisedFault::Native {
                    type_name: type_name.clone(),
                    what,
                });
            }
            Stmt::Exit(code) => {
                let code = integer(self.eval(code)?, "std::exit")?;
                tracing::info!(code, "std::exit called, terminating");
                std::process::exit(code as i32);
            }
            Stmt::Expr(expr) => {
                self.eval(expr)?;
            }
        }
        Ok(())
    }

    fn eval(&self, expr: &Expr) -> Result<Value, RaisedFault> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Var(name) => self
                .env
                .get(name)
                .map(|binding| binding.value.clone())
                .ok_or_else(|| undeclared(name)),
            Expr::Unary(op, operand) => {
                let value = self.eval(operand)?;
                match op {
                    UnOp::Not => Ok(Value::Bool(!value.is_truthy())),
                    UnOp::Neg => match value.as_number() {
                        Some(Number::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
                        Some(Number::Float(f)) => Ok(Value::Float(-f)),
                        None => Err(error(format!(
                            "invalid argument type '{}' to unary expression",
                            value.type_name()
                        ))),
                    },
                }
            }
            Expr::Binary(BinOp::And, lhs, rhs) => {
                Ok(Value::Bool(self.eval(lhs)?.is_truthy() && self.eval(rhs)?.is_truthy()))
            }
            Expr::Binary(BinOp::Or, lhs, rhs) => {
                Ok(Value::Bool(self.eval(lhs)?.is_truthy() || self.eval(rhs)?.is_truthy()))
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                self.binary(*op, lhs, rhs)
            }
            Expr::Call(name, args) => {
                let args = args.iter().map(|arg| self.eval(arg)).collect::<Result<Vec<_>, _>>()?;
                call(name, &args)
            }
        }
    }

    fn binary(&self, op: BinOp, lhs: Value, rhs: Value) -> Result<Value, RaisedFault> {
        let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) else {
            return Err(error(format!(
                "invalid operands to binary expression ('{}' and '{}')",
                lhs.type_name(),
                rhs.type_name()
            )));
        };

        if let (Number::Int(a), Number::Int(b)) = (a, b) {
            return match op {
                BinOp::Add => Ok(Value::Int(a.wrapping_add(b))),
                BinOp::Sub => Ok(Value::Int(a.wrapping_sub(b))),
                BinOp::Mul => Ok(Value::Int(a.wrapping_mul(b))),
                BinOp::Div | BinOp::Rem if b == 0 => Err(self.division_by_zero()),
                BinOp::Div => Ok(Value::Int(a.wrapping_div(b))),
                BinOp::Rem => Ok(Value::Int(a.wrapping_rem(b))),
                _ => Ok(Value::Bool(compare(op, a.cmp(&b)))),
            };
        }

        let (x, y) = (a.as_f64(), b.as_f64());
        match op {
            BinOp::Add => Ok(Value::Float(x + y)),
            BinOp::Sub => Ok(Value::Float(x - y)),
            BinOp::Mul => Ok(Value::Float(x * y)),
            BinOp::Div => Ok(Value::Float(x / y)),
            BinOp::Rem => Err(error(format!(
                "invalid operands to binary expression ('{}' and '{}')",
                lhs.type_name(),
                rhs.type_name()
            ))),
            _ => Ok(Value::Bool(match x.partial_cmp(&y) {
                Some(ordering) => compare(op, ordering),
                None => op == BinOp::Ne,
            })),
        }
    }

    /// Integer division by zero is SIGFPE: catchable only while the fault
    /// guard is engaged.
    fn division_by_zero(&self) -> RaisedFault {
        match self.mode {
            FaultMode::Catchable => RaisedFault::Signal("SIGFPE: integer division by zero".to_string()),
            FaultMode::Fatal => {
                tracing::error!("integer division by zero outside the fault guard, aborting");
                std::process::abort()
            }
        }
    }

    /// Check every name in the block against what is declared, in order.
    fn resolve(&self, stmts: &[Stmt]) -> Result<(), RaisedFault> {
        let mut known: HashSet<&str> = self.env.keys().map(String::as_str).collect();
        for stmt in stmts {
            match stmt {
                Stmt::Declare { name, init, .. } => {
                    if let Some(init) = init {
                        resolve_expr(init, &known)?;
                    }
                    if !known.insert(name.as_str()) {
                        return Err(error(format!("redefinition of '{}'", name)));
                    }
                }
                Stmt::Assign { name, value, .. } => {
                    if !known.contains(name.as_str()) {
                        return Err(undeclared(name));
                    }
                    resolve_expr(value, &known)?;
                }
                Stmt::Print { items, .. } => {
                    for item in items {
                        if let Item::Value(expr) | Item::Precision(expr) = item {
                            resolve_expr(expr, &known)?;
                        }
                    }
                }
                Stmt::Throw { message, .. } => resolve_expr(message, &known)?,
                Stmt::Exit(expr) | Stmt::Expr(expr) => resolve_expr(expr, &known)?,
            }
        }
        Ok(())
    }
}

fn resolve_expr(expr: &Expr, known: &HashSet<&str>) -> Result<(), RaisedFault> {
    match expr {
        Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) | Expr::Str(_) => Ok(()),
        Expr::Var(name) if known.contains(name.as_str()) => Ok(()),
        Expr::Var(name) => Err(undeclared(name)),
        Expr::Unary(_, operand) => resolve_expr(operand, known),
        Expr::Binary(_, lhs, rhs) => {
            resolve_expr(lhs, known)?;
            resolve_expr(rhs, known)
        }
        Expr::Call(name, args) => {
            if !FUNCTIONS.contains(&name.as_str()) {
                return Err(undeclared(name));
            }
            args.iter().try_for_each(|arg| resolve_expr(arg, known))
        }
    }
}

fn undeclared(name: &str) -> RaisedFault {
    error(format!("use of undeclared identifier '{}'", name))
}

fn compare(op: BinOp, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        BinOp::Eq => ordering == Equal,
        BinOp::Ne => ordering != Equal,
        BinOp::Lt => ordering == Less,
        BinOp::Le => ordering != Greater,
        BinOp::Gt => ordering == Greater,
        BinOp::Ge => ordering != Less,
        _ => false,
    }
}

fn call(name: &str, args: &[Value]) -> Result<Value, RaisedFault> {
    let numbers: Option<Vec<Number>> = args.iter().map(Value::as_number).collect();
    match (name, numbers.as_deref()) {
        ("std::sqrt", Some([x])) => Ok(Value::Float(x.as_f64().sqrt())),
        ("std::pow", Some([x, y])) => Ok(Value::Float(x.as_f64().powf(y.as_f64()))),
        ("std::abs", Some([Number::Int(n)])) => Ok(Value::Int(n.wrapping_abs())),
        ("std::abs", Some([Number::Float(f)])) => Ok(Value::Float(f.abs())),
        _ => Err(error(format!("no matching function for call to '{}'", name))),
    }
}

fn integer(value: Value, context: &str) -> Result<i64, RaisedFault> {
    match value.as_number() {
        Some(Number::Int(n)) => Ok(n),
        Some(Number::Float(f)) => Ok(f as i64),
        None => Err(error(format!("no matching function for call to '{}'", context))),
    }
}

fn zero(ty: Type) -> Value {
    match ty {
        Type::Double => Value::Float(0.0),
        Type::Bool => Value::Bool(false),
        Type::Int | Type::Auto => Value::Int(0),
    }
}

fn deduce(value: &Value) -> Type {
    match value {
        Value::Int(_) => Type::Int,
        Value::Float(_) => Type::Double,
        Value::Bool(_) => Type::Bool,
        Value::Str(_) => Type::Auto,
    }
}

/// Implicit conversion on initialization and assignment.
fn coerce(ty: Type, value: Value) -> Result<Value, RaisedFault> {
    let converted = match (ty, &value) {
        (Type::Auto, _) => Some(value.clone()),
        (Type::Int, Value::Int(_)) | (Type::Double, Value::Float(_)) | (Type::Bool, Value::Bool(_)) => {
            Some(value.clone())
        }
        (Type::Int, Value::Float(f)) => Some(Value::Int(*f as i64)),
        (Type::Int, Value::Bool(b)) => Some(Value::Int(i64::from(*b))),
        (Type::Double, Value::Int(n)) => Some(Value::Float(*n as f64)),
        (Type::Double, Value::Bool(b)) => Some(Value::Float(f64::from(u8::from(*b)))),
        (Type::Bool, other) => match other {
            Value::Str(_) => None,
            other => Some(Value::Bool(other.is_truthy())),
        },
        _ => None,
    };
    converted.ok_or_else(|| {
        error(format!(
            "cannot initialize a variable of type '{}' with an lvalue of type '{}'",
            type_label(ty),
            value.type_name()
        ))
    })
}

fn type_label(ty: Type) -> &'static str {
    match ty {
        Type::Int => "int",
        Type::Double => "double",
        Type::Bool => "bool",
        Type::Auto => "auto",
    }
}

impl Engine for CalcEngine {
    fn define(&mut self, source: &str) -> Result<Captured, EngineError> {
        let Some(target) = source.trim().strip_prefix("#include") else {
            return Err(error(format!("expected a preprocessor directive, found '{}'", source.trim())).into());
        };
        let target = target.trim();
        let header = target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .or_else(|| target.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
            .ok_or_else(|| error("expected \"FILENAME\" or <FILENAME>"))?;

        if !KNOWN_HEADERS.contains(&header) {
            return Err(RaisedFault::Other(format!("fatal error: '{}' file not found", header)).into());
        }
        tracing::debug!(header, "header included");
        Ok(Captured::default())
    }

    fn execute(&mut self, block: &str) -> Result<Captured, EngineError> {
        let stmts = Parser::new(tokenize(block)?).parse_block()?;
        self.resolve(&stmts)?;

        let mut out = Captured::default();
        match self.run_block(&stmts, &mut out) {
            Ok(()) => Ok(out),
            Err(fault) => Err(EngineError::with_captured(fault, out)),
        }
    }

    fn set_fault_mode(&mut self, mode: FaultMode) -> FaultMode {
        std::mem::replace(&mut self.mode, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::FaultGuard;
    use crate::worker::Worker;
    use litrun_protocol::{ExecutionRequest, Fault, FaultKind};

    fn run(engine: &mut CalcEngine, block: &str) -> Result<Captured, EngineError> {
        engine.execute(block)
    }

    fn handle(worker: &mut Worker<CalcEngine>, code: &str) -> litrun_protocol::ExecutionResponse {
        worker.handle(&ExecutionRequest { code: code.to_string() })
    }

    #[test]
    fn bare_expression_is_printed() {
        let mut worker = Worker::new(CalcEngine::new());
        let response = handle(&mut worker, "1 + 1");
        assert_eq!(response.stdout, "2");
        assert_eq!(response.stderr, "");
        assert_eq!(response.fault, None);
    }

    #[test]
    fn declarations_persist_between_requests() {
        let mut worker = Worker::new(CalcEngine::new());
        assert_eq!(handle(&mut worker, "int x = 40;").fault, None);
        assert_eq!(handle(&mut worker, "x + 2").stdout, "42");
        assert!(worker.engine().is_declared("x"));
    }

    #[test]
    fn undeclared_name_runs_nothing() {
        let mut engine = CalcEngine::new();
        let err = run(&mut engine, "std::cout << 1;\nstd::cout << y;").unwrap_err();
        assert_eq!(err.fault, RaisedFault::Other("error: use of undeclared identifier 'y'".to_string()));
        assert_eq!(err.captured, Captured::default());
    }

    #[test]
    fn redefinition_is_rejected() {
        let mut engine = CalcEngine::new();
        run(&mut engine, "int x = 1;").unwrap();
        let err = run(&mut engine, "double x = 2.0;").unwrap_err();
        assert_eq!(err.fault, RaisedFault::Other("error: redefinition of 'x'".to_string()));
    }

    #[test]
    fn output_before_a_throw_is_kept() {
        let mut worker = Worker::new(CalcEngine::new());
        let response = handle(
            &mut worker,
            "std::cout << \"before\" << std::endl;\nthrow std::invalid_argument(\"negative\");",
        );
        assert_eq!(response.stdout, "before\n");
        assert_eq!(response.fault, Some(Fault::value("negative")));

        let response = handle(&mut worker, "throw std::runtime_error(\"boom\");");
        assert_eq!(response.fault.map(|f| f.kind), Some(FaultKind::GenericFault));
    }

    #[test]
    fn boolalpha_and_precision() {
        let mut worker = Worker::new(CalcEngine::new());
        assert_eq!(handle(&mut worker, "1 < 2").stdout, "true");
        assert_eq!(handle(&mut worker, "std::sqrt(2.0)").stdout, "1.41421");
        // boolalpha sticks, as it does on std::cout.
        assert_eq!(handle(&mut worker, "std::cout << (3 == 3);").stdout, "true");
        assert_eq!(handle(&mut worker, "std::cout << std::noboolalpha << (3 == 3);").stdout, "1");

        let mut engine = CalcEngine::new();
        let out = run(&mut engine, "std::cout << std::setprecision(3) << 2.0 / 3.0;").unwrap();
        assert_eq!(out.stdout, "0.667");
        // Stream state outlives the block.
        assert_eq!(run(&mut engine, "std::cout << 1.23456;").unwrap().stdout, "1.23");
    }

    #[test]
    fn huge_precision_is_clamped() {
        let mut engine = CalcEngine::new();
        let out = run(&mut engine, "std::cout << std::setprecision(100000000) << 0.5;").unwrap();
        assert_eq!(out.stdout, "0.5");
        // The clamp persists with the stream state.
        assert_eq!(run(&mut engine, "std::cout << 0.25;").unwrap().stdout, "0.25");
    }

    #[test]
    fn arithmetic_and_conversions() {
        let mut engine = CalcEngine::new();
        let out = run(
            &mut engine,
            "int n = 7.9;\nn *= 2;\nauto d = n / 4.0;\nbool b = n;\nstd::cout << n << \" \" << d << \" \" << b << \" \" << 7 % 3 << \" \" << -std::abs(-4);",
        )
        .unwrap();
        assert_eq!(out.stdout, "14 3.5 1 1 -4");
    }

    #[test]
    fn cerr_goes_to_stderr() {
        let mut engine = CalcEngine::new();
        let out = run(&mut engine, "std::cerr << \"warn\";\nstd::cout << \"ok\";").unwrap();
        assert_eq!(out, Captured { stdout: "ok".to_string(), stderr: "warn".to_string() });
    }

    #[test]
    fn division_by_zero_is_a_signal_under_the_guard() {
        let mut engine = CalcEngine::new();
        let mut guard = FaultGuard::engage(&mut engine);
        let err = guard.execute("int z = 0;\nstd::cout << 1 / z;").unwrap_err();
        assert_eq!(err.fault, RaisedFault::Signal("SIGFPE: integer division by zero".to_string()));
    }

    #[test]
    fn includes() {
        let mut engine = CalcEngine::new();
        assert!(engine.define("#include <cmath>").is_ok());
        assert!(engine.define("#include \"iomanip\"").is_ok());
        let err = engine.define("#include <boost/multiprecision.hpp>").unwrap_err();
        assert_eq!(
            err.fault,
            RaisedFault::Other("fatal error: 'boost/multiprecision.hpp' file not found".to_string())
        );

        let mut worker = Worker::new(CalcEngine::new());
        let response = handle(&mut worker, "#include <nope>\n1");
        assert_eq!(response.stdout, "");
        assert_eq!(response.fault, Some(Fault::generic("fatal error: 'nope' file not found")));
    }

    #[test]
    fn string_operands_are_rejected() {
        let mut engine = CalcEngine::new();
        let err = run(&mut engine, "\"a\" + 1;").unwrap_err();
        assert_eq!(
            err.fault,
            RaisedFault::Other("error: invalid operands to binary expression ('const char *' and 'int')".to_string())
        );
    }
}
