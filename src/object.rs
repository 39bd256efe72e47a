use crate::ast::FunctionLiteral;
use crate::environment::Env;
use rustc_hash::FxHashMap;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// Native function signature. Builtins validate their own arguments and report
/// failures as a plain message; the evaluator attaches the call site.
pub type BuiltinFn = fn(&[Object], &mut dyn Write) -> Result<Object, String>;

/// Runtime values. Arrays, hashes and functions are reference-counted so
/// passing them around never copies their contents, and `==` on them compares
/// identity.
#[derive(Clone)]
pub enum Object {
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
    Array(Rc<Vec<Object>>),
    Hash(Rc<HashObject>),
    Function(Rc<Function>),
    Builtin(Builtin),
}

pub const NULL: Object = Object::Null;
pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    String,
    Boolean,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::String => "STRING",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
        };
        write!(f, "{}", name)
    }
}

impl Object {
    pub fn native_bool(value: bool) -> Object {
        if value {
            TRUE
        } else {
            FALSE
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::String(_) => ObjectType::String,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
        }
    }

    /// Only `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    /// `None` for values that cannot be used as hash keys.
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Object::Integer(n) => *n as u64,
            Object::Boolean(true) => 1,
            Object::Boolean(false) => 2,
            Object::String(s) => fnv1a(s.as_bytes()),
            _ => return None,
        };
        Some(HashKey {
            object_type: self.object_type(),
            value,
        })
    }

    /// Equality as seen by `==` outside the integer and string cases: scalars
    /// compare by value, containers and functions by identity.
    pub fn is_identical(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Integer(l), Object::Integer(r)) => l == r,
            (Object::String(l), Object::String(r)) => l == r,
            (Object::Boolean(l), Object::Boolean(r)) => l == r,
            (Object::Null, Object::Null) => true,
            (Object::Array(l), Object::Array(r)) => Rc::ptr_eq(l, r),
            (Object::Hash(l), Object::Hash(r)) => Rc::ptr_eq(l, r),
            (Object::Function(l), Object::Function(r)) => Rc::ptr_eq(l, r),
            (Object::Builtin(l), Object::Builtin(r)) => l.name == r.name,
            _ => false,
        }
    }

    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{}", n),
            Object::String(s) => write!(f, "{}", s),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::Null => write!(f, "null"),
            Object::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Object::Hash(hash) => {
                write!(f, "{{")?;
                for (i, pair) in hash.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Object::Function(function) => write!(f, "{}", function.literal),
            Object::Builtin(_) => write!(f, "builtin function"),
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::String(s) => write!(f, "String({:?})", s),
            other => write!(f, "{}({})", other.object_type(), other),
        }
    }
}

/// Structural equality, meant for tests and host code. The language's own `==`
/// goes through the evaluator.
impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Array(l), Object::Array(r)) => l == r,
            (Object::Hash(l), Object::Hash(r)) => l == r,
            _ => self.is_identical(other),
        }
    }
}

/// A closure: the literal it was created from plus the environment that was
/// active when the literal was evaluated.
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Env,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // The captured environment may contain this very function.
        write!(f, "Function({})", self.literal)
    }
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// Hash map value. Entries keep the order in which their keys were first
/// inserted; re-inserting a key replaces the value in place.
#[derive(Debug, Clone, Default)]
pub struct HashObject {
    pairs: Vec<HashPair>,
    index: FxHashMap<HashKey, usize>,
}

impl HashObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: HashKey, pair: HashPair) {
        match self.index.get(&key) {
            Some(&slot) => self.pairs[slot] = pair,
            None => {
                self.index.insert(key, self.pairs.len());
                self.pairs.push(pair);
            }
        }
    }

    pub fn get(&self, key: &HashKey) -> Option<&HashPair> {
        self.index.get(key).map(|&slot| &self.pairs[slot])
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HashPair> {
        self.pairs.iter()
    }
}

impl PartialEq for HashObject {
    fn eq(&self, other: &HashObject) -> bool {
        self.len() == other.len()
            && self
                .index
                .iter()
                .all(|(key, &slot)| other.get(key) == Some(&self.pairs[slot]))
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
