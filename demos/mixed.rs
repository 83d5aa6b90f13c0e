use std::mem::{size_of, size_of_val};

use padless::{equals, Record};

padless::record! {
    #[derive(Clone, Debug, PartialEq)]
    struct Mixed(u8, i32, u8, i32, u8, f64, u8);

    #[derive(Debug)]
    struct Small(u8, i32, u8);

    #[derive(Debug)]
    struct One(i32);
}

// declaration order, as a C compiler lays it out
#[allow(dead_code)]
#[repr(C)]
struct Naive(u8, i32, u8, i32, u8, f64, u8);

fn main() {
    tracing_subscriber::fmt::init();
    let record = Mixed::new(b'a', 1, b'c', 3, b'd', 5.0, b'e');
    let tuple: (u8, i32, u8, i32, u8, f64, u8) = (b'a', 1, b'c', 3, b'd', 5.0, b'e');

    tracing::info!(bytes = size_of::<Mixed>(), "record");
    tracing::info!(bytes = size_of::<Naive>(), "repr(C) struct");
    tracing::info!(bytes = 4 * size_of::<u8>() + 2 * size_of::<i32>() + size_of::<f64>(), "data");
    let (permutation, inverse) = (Mixed::PERMUTATION, Mixed::INVERSE);
    tracing::info!(?permutation, ?inverse, "storage order");
    tracing::info!(
        record = %char::from(*record.get::<2>()),
        tuple = %char::from(tuple.2),
        "element 2"
    );
    let small = Small::new(b'x', 2, b'y');
    let one = One::new(4);
    tracing::info!(?small, bytes = size_of_val(&small));
    tracing::info!(?one, bytes = size_of_val(&one));
    tracing::info!(?record);

    assert!(record == tuple);
    assert!(equals(&tuple, &record.clone()));
}
