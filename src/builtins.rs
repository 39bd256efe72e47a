use crate::object::{Builtin, Object, NULL};
use std::io::Write;
use std::rc::Rc;

/// Native functions visible from every scope unless shadowed by a binding.
pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "len", func: len },
    Builtin { name: "first", func: first },
    Builtin { name: "last", func: last },
    Builtin { name: "rest", func: rest },
    Builtin { name: "push", func: push },
    Builtin { name: "puts", func: puts },
];

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name).copied()
}

fn check_arity(args: &[Object], want: usize) -> Result<(), String> {
    if args.len() == want {
        Ok(())
    } else {
        Err(format!(
            "wrong number of arguments. got={}, want={}",
            args.len(),
            want
        ))
    }
}

fn array_argument<'a>(name: &str, arg: &'a Object) -> Result<&'a Rc<Vec<Object>>, String> {
    match arg {
        Object::Array(elements) => Ok(elements),
        other => Err(format!(
            "argument to `{}` must be ARRAY, got {}",
            name,
            other.object_type()
        )),
    }
}

fn len(args: &[Object], _out: &mut dyn Write) -> Result<Object, String> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::String(s) => Ok(Object::Integer(s.chars().count() as i64)),
        Object::Array(elements) => Ok(Object::Integer(elements.len() as i64)),
        other => Err(format!(
            "argument to `len` not supported, got {}",
            other.object_type()
        )),
    }
}

fn first(args: &[Object], _out: &mut dyn Write) -> Result<Object, String> {
    check_arity(args, 1)?;
    let elements = array_argument("first", &args[0])?;
    Ok(elements.first().cloned().unwrap_or(NULL))
}

fn last(args: &[Object], _out: &mut dyn Write) -> Result<Object, String> {
    check_arity(args, 1)?;
    let elements = array_argument("last", &args[0])?;
    Ok(elements.last().cloned().unwrap_or(NULL))
}

fn rest(args: &[Object], _out: &mut dyn Write) -> Result<Object, String> {
    check_arity(args, 1)?;
    let elements = array_argument("rest", &args[0])?;
    if elements.is_empty() {
        return Ok(NULL);
    }
    Ok(Object::Array(Rc::new(elements[1..].to_vec())))
}

/// Returns a new array; the argument is left unchanged.
fn push(args: &[Object], _out: &mut dyn Write) -> Result<Object, String> {
    check_arity(args, 2)?;
    let elements = array_argument("push", &args[0])?;
    let mut extended = Vec::with_capacity(elements.len() + 1);
    extended.extend(elements.iter().cloned());
    extended.push(args[1].clone());
    Ok(Object::Array(Rc::new(extended)))
}

fn puts(args: &[Object], out: &mut dyn Write) -> Result<Object, String> {
    for arg in args {
        writeln!(out, "{}", arg).map_err(|e| format!("puts failed: {}", e))?;
    }
    Ok(NULL)
}
