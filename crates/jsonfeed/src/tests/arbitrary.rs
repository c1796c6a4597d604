use quickcheck::{Arbitrary, Gen};

use crate::{Array, Map, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct JsonFloat(f64);

impl Arbitrary for JsonFloat {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }

        Self(value)
    }
}

/// A value that can stand as a top-level document: an object or an array.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Document(pub(crate) Value);

fn gen_scalar(g: &mut Gen) -> Value {
    match usize::arbitrary(g) % 5 {
        0 => Value::Null,
        1 => Value::Boolean(bool::arbitrary(g)),
        2 => Value::Integer(i64::arbitrary(g)),
        3 => Value::Float(JsonFloat::arbitrary(g).0),
        _ => Value::String(String::arbitrary(g)),
    }
}

fn gen_array(g: &mut Gen, depth: usize) -> Value {
    let len = usize::arbitrary(g) % 4;
    let items: Array = (0..len).map(|_| gen_val(g, depth)).collect();
    Value::Array(items)
}

fn gen_object(g: &mut Gen, depth: usize) -> Value {
    let len = usize::arbitrary(g) % 4;
    let mut map = Map::new();
    for _ in 0..len {
        let key = String::arbitrary(g);
        let val = gen_val(g, depth);
        map.insert(key, val);
    }
    Value::Object(map)
}

fn gen_val(g: &mut Gen, depth: usize) -> Value {
    if depth == 0 {
        return gen_scalar(g);
    }
    match usize::arbitrary(g) % 4 {
        0 => gen_array(g, depth - 1),
        1 => gen_object(g, depth - 1),
        _ => gen_scalar(g),
    }
}

impl Arbitrary for Document {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 3;
        if bool::arbitrary(g) {
            Self(gen_array(g, depth))
        } else {
            Self(gen_object(g, depth))
        }
    }
}
