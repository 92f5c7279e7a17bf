use bytestream::{ByteReader, ByteWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Bool(bool),
    U8(u8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Blob(Vec<u8>),
}

fn op_len(op: &Op) -> usize {
    match op {
        Op::Bool(_) | Op::U8(_) => 1,
        Op::U16(_) | Op::I16(_) => 2,
        Op::U32(_) | Op::I32(_) | Op::F32(_) => 4,
        Op::U64(_) | Op::I64(_) | Op::F64(_) => 8,
        Op::Str(s) => (s.encode_utf16().count() + 1) * 2,
        Op::Blob(b) => b.len(),
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Bool),
        any::<u8>().prop_map(Op::U8),
        any::<u16>().prop_map(Op::U16),
        any::<i16>().prop_map(Op::I16),
        any::<u32>().prop_map(Op::U32),
        any::<i32>().prop_map(Op::I32),
        any::<u64>().prop_map(Op::U64),
        any::<i64>().prop_map(Op::I64),
        any::<f32>().prop_map(Op::F32),
        any::<f64>().prop_map(Op::F64),
        "\\PC{0,12}".prop_map(Op::Str),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Op::Blob),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..32)) {
        let total: usize = ops.iter().map(op_len).sum();
        let mut writer = ByteWriter::with_len(total);

        for op in &ops {
            match op {
                Op::Bool(v) => writer.write_bool(*v).unwrap(),
                Op::U8(v) => writer.write_u8(*v).unwrap(),
                Op::U16(v) => writer.write_u16(*v).unwrap(),
                Op::I16(v) => writer.write_i16(*v).unwrap(),
                Op::U32(v) => writer.write_u32(*v).unwrap(),
                Op::I32(v) => writer.write_i32(*v).unwrap(),
                Op::U64(v) => writer.write_u64(*v).unwrap(),
                Op::I64(v) => writer.write_i64(*v).unwrap(),
                Op::F32(v) => writer.write_f32(*v).unwrap(),
                Op::F64(v) => writer.write_f64(*v).unwrap(),
                Op::Str(v) => writer.write_utf16_string(v).unwrap(),
                Op::Blob(v) => writer.write_bytes(v).unwrap(),
            }
        }
        prop_assert_eq!(writer.remaining(), 0);

        let buf = writer.into_inner();
        let mut reader = ByteReader::new(&buf);

        for op in &ops {
            match op {
                Op::Bool(v) => prop_assert_eq!(reader.read_bool().unwrap(), *v),
                Op::U8(v) => prop_assert_eq!(reader.read_u8().unwrap(), *v),
                Op::U16(v) => prop_assert_eq!(reader.read_u16().unwrap(), *v),
                Op::I16(v) => prop_assert_eq!(reader.read_i16().unwrap(), *v),
                Op::U32(v) => prop_assert_eq!(reader.read_u32().unwrap(), *v),
                Op::I32(v) => prop_assert_eq!(reader.read_i32().unwrap(), *v),
                Op::U64(v) => prop_assert_eq!(reader.read_u64().unwrap(), *v),
                Op::I64(v) => prop_assert_eq!(reader.read_i64().unwrap(), *v),
                Op::F32(v) => {
                    let read = reader.read_f32().unwrap();
                    prop_assert_eq!(read.to_bits(), v.to_bits());
                }
                Op::F64(v) => {
                    let read = reader.read_f64().unwrap();
                    prop_assert_eq!(read.to_bits(), v.to_bits());
                }
                Op::Str(v) => prop_assert_eq!(&reader.read_utf16_string().unwrap(), v),
                Op::Blob(v) => prop_assert_eq!(reader.read_bytes(v.len()).unwrap(), &v[..]),
            }
        }
        prop_assert_eq!(reader.remaining(), 0);
    }
}
