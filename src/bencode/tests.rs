use std::collections::HashMap;

use super::*;

#[test]
fn test_roundtrip_canonical_torrent() {
    let original: &[u8] = b"d8:announce15:http://test.com13:announce-listll2:t12:t2el2:t3ee4:infod6:lengthi1024e4:name5:a.iso12:piece lengthi16384eee";
    let decoded = decode_bencode(original).unwrap();
    assert_eq!(encode_bvalue(&decoded), original);
}

#[test]
fn test_roundtrip_nested_structures() {
    let data: &[u8] = b"d5:emptyle4:listl4:spami42ed0:leeee";
    let decoded = decode_bencode(data).unwrap();
    assert_eq!(encode_bvalue(&decoded), data);
}

#[test]
fn test_non_canonical_input_is_reordered() {
    let decoded = decode_bencode(b"d1:bi1e1:ai2ee").unwrap();
    assert_eq!(encode_bvalue(&decoded), b"d1:ai2e1:bi1ee");
}

#[test]
fn test_value_survives_encode_decode() {
    let mut info = HashMap::new();
    info.insert(b"name".to_vec(), BValue::string("example.txt"));
    info.insert(b"length".to_vec(), BValue::Integer(1024));
    info.insert(b"pieces".to_vec(), BValue::ByteString(vec![0, 1, 2, 0xff]));

    let mut root = HashMap::new();
    root.insert(b"info".to_vec(), BValue::Dict(info));
    root.insert(b"announce".to_vec(), BValue::string("http://tracker.example.com/announce"));
    root.insert(
        b"announce-list".to_vec(),
        BValue::List(vec![BValue::List(vec![BValue::string("t1")])]),
    );
    root.insert(b"negative".to_vec(), BValue::Integer(-7));
    let value = BValue::Dict(root);

    assert_eq!(decode_bencode(&encode_bvalue(&value)).unwrap(), value);
}

#[test]
fn test_binary_keys_roundtrip() {
    let mut map = HashMap::new();
    map.insert(vec![0xff, 0x00], BValue::Integer(1));
    map.insert(vec![0x01], BValue::Integer(2));
    let value = BValue::Dict(map);

    let encoded = encode_bvalue(&value);
    assert_eq!(encoded, vec![b'd', b'1', b':', 0x01, b'i', b'2', b'e', b'2', b':', 0xff, 0x00, b'i', b'1', b'e', b'e']);
    assert_eq!(decode_bencode(&encoded).unwrap(), value);
}
