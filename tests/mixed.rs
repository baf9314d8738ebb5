mod common;

use std::{cell::RefCell, collections::HashSet};

use common::{Call, CallCounter, DerivedMock, Mock};
use exl::{class, otherwise, t, when, when_exact, Mixed, T};

#[test]
fn construction() {
    let calls = CallCounter::default();
    let m: Mixed![Mock, i32] = Mixed::new(Mock::new(1, &calls));

    assert!(m.holds::<Mock, _>());
    assert!(!m.holds::<i32, _>());
    assert_eq!(m.unwrap::<Mock>().tag(), 1);
    assert_eq!(calls.count(Call::Construct, 1), 1);
    assert_eq!(calls.count(Call::Clone, 1), 0);

    let copy = m.clone();
    assert_eq!(copy.unwrap_exact::<Mock, _>().tag(), 1);
    assert_eq!(calls.count(Call::Clone, 1), 1);
}

#[test]
fn destruction() {
    let calls = CallCounter::default();
    {
        let _m: Mixed![i32, Mock] = Mixed::new(Mock::new(1, &calls));
        assert_eq!(calls.count(Call::Drop, 1), 0);
    }
    assert_eq!(calls.count(Call::Drop, 1), 1);
}

#[test]
fn assign_to_different_variant() {
    let calls = CallCounter::default();
    let mut m: Mixed![i32, Mock] = Mixed::new(5);

    m.assign(Mock::new(2, &calls));
    assert_eq!(m.unwrap::<Mock>().tag(), 2);
    assert_eq!(calls.count(Call::Clone, 2), 0);

    m.assign(7);
    assert_eq!(calls.count(Call::Drop, 2), 1);
    assert_eq!(m.get::<i32, _>(), Some(&7));
}

#[test]
fn assign_to_same_variant() {
    let calls = CallCounter::default();
    let mut m: Mixed![i32, Mock] = Mixed::new(Mock::new(1, &calls));

    m.assign(Mock::new(2, &calls));
    assert_eq!(m.unwrap::<Mock>().tag(), 2);
    assert_eq!(calls.count(Call::Drop, 1), 1);
    assert_eq!(calls.count(Call::Drop, 2), 0);
    assert_eq!(calls.count(Call::Clone, 2), 0);

    let source: Mixed![i32, Mock] = Mixed::new(Mock::new(3, &calls));
    m.clone_from(&source);
    assert_eq!(m.unwrap::<Mock>().tag(), 3);
    assert_eq!(calls.count(Call::CloneAssign, 3), 1);
    assert_eq!(calls.count(Call::Clone, 3), 0);
    assert_eq!(calls.count(Call::Drop, 2), 0);
}

#[test]
fn clone_from_different_variant() {
    let calls = CallCounter::default();
    let mut m: Mixed![i32, Mock] = Mixed::new(Mock::new(1, &calls));
    let source: Mixed![i32, Mock] = Mixed::new(9);

    m.clone_from(&source);
    assert_eq!(m.get::<i32, _>(), Some(&9));
    assert_eq!(calls.count(Call::Drop, 1), 1);
}

#[test]
fn construct_from_subset() {
    let calls = CallCounter::default();
    let small: Mixed![char, Mock] = Mixed::new(Mock::new(9, &calls));

    let copied: Mixed![i32, Mock, char] = small.broaden_cloned();
    assert_eq!(copied.unwrap::<Mock>().tag(), 9);
    assert_eq!(copied.tag(), 1);
    assert_eq!(calls.count(Call::Clone, 9), 1);

    let moved: Mixed![i32, Mock, char] = small.broaden();
    assert_eq!(moved.unwrap::<Mock>().tag(), 9);
    assert_eq!(calls.count(Call::Clone, 9), 1);
    assert_eq!(calls.count(Call::Construct, 9), 1);
}

#[test]
fn subset_round_trip() {
    let small: Mixed![char, String] = Mixed::new(String::from("hi"));
    let wide: Mixed![i32, String, char] = small.broaden_cloned();
    assert_eq!(wide.unwrap::<String>(), "hi");

    let narrowed = wide.narrow::<T![char, String], _>().ok().unwrap();
    assert_eq!(narrowed.unwrap::<String>(), "hi");
    assert_eq!(narrowed, small);

    let number: Mixed![i32, String, char] = Mixed::new(4);
    let rest = number.narrow::<T![char, String], _>().err().unwrap();
    assert_eq!(rest.into_inner(), 4);
}

#[test]
fn assign_from_subset() {
    let calls = CallCounter::default();
    let mut m: Mixed![i32, Mock, char] = Mixed::new(1);

    m.assign_from(Mixed::<T![Mock, char]>::new(Mock::new(3, &calls)));
    assert_eq!(m.unwrap::<Mock>().tag(), 3);
    assert_eq!(calls.count(Call::Drop, 3), 0);
    assert_eq!(calls.count(Call::Clone, 3), 0);

    m.assign_from(Mixed::<T![Mock]>::new(Mock::new(4, &calls)));
    assert_eq!(m.unwrap::<Mock>().tag(), 4);
    assert_eq!(calls.count(Call::Drop, 3), 1);
    assert_eq!(calls.count(Call::Drop, 4), 0);

    let source: Mixed![char] = Mixed::new('q');
    m.clone_assign_from(&source);
    assert_eq!(m.get::<char, _>(), Some(&'q'));
    assert_eq!(calls.count(Call::Drop, 4), 1);

    let source: Mixed![Mock, i32] = Mixed::new(Mock::new(5, &calls));
    m.assign(Mock::new(6, &calls));
    m.clone_assign_from(&source);
    assert_eq!(m.unwrap::<Mock>().tag(), 5);
    assert_eq!(calls.count(Call::CloneAssign, 5), 1);
    assert_eq!(calls.count(Call::Clone, 5), 0);
}

#[test]
fn emplace_constructs_once_after_drop() {
    let calls = CallCounter::default();
    let mut m: Mixed![i32, Mock] = Mixed::new(0);

    m.emplace(|| Mock::new(5, &calls));
    assert_eq!(calls.log(), [(Call::Construct, 5)]);

    let fresh = m.emplace(|| Mock::new(6, &calls));
    fresh.set_tag(60);
    assert_eq!(
        calls.log(),
        [(Call::Construct, 5), (Call::Drop, 5), (Call::Construct, 6)]
    );
    assert_eq!(m.unwrap::<Mock>().tag(), 60);
}

#[test]
fn in_place_construction() {
    let calls = CallCounter::default();
    let m: Mixed![i32, Mock] = Mixed::in_place(exl::in_place_type::<Mock>(), || Mock::new(8, &calls));
    assert_eq!(m.unwrap::<Mock>().tag(), 8);

    let m: Mixed![i32, Mock] = Mixed::make(|| 12);
    assert_eq!(m.get::<i32, _>(), Some(&12));
    assert_eq!(calls.log(), [(Call::Construct, 8)]);
}

#[test]
fn best_match_construction() {
    let m: Mixed![i64, String] = Mixed::convert("text");
    assert_eq!(m.unwrap_exact::<String, _>(), "text");

    let m: Mixed![i64, String] = Mixed::convert(5i32);
    assert_eq!(m.get::<i64, _>(), Some(&5));

    let m: Mixed![i64, String] = Mixed::convert(6i64);
    assert_eq!(m.tag(), 0);
}

#[test]
fn best_match_prefers_exact_type() {
    let m = exl::convert!(Mixed![u32, char], 'c');
    assert_eq!(m.tag(), 1);
    assert_eq!(m.get::<char, _>(), Some(&'c'));

    let m = exl::convert!(Mixed![u64, u32], 7u32);
    assert_eq!(m.tag(), 1);

    let m = exl::convert!(Mixed![i64, String], "text");
    assert_eq!(m.unwrap_exact::<String, _>(), "text");
}

#[test]
fn best_match_assignment() {
    let calls = CallCounter::default();
    let mut m: Mixed![u64, Mock, char] = Mixed::new(1u64);

    exl::assign_convert!(m, 'x');
    assert_eq!(m.tag(), 2);
    exl::assign_convert!(m, 5u32);
    assert_eq!(m.get::<u64, _>(), Some(&5));

    exl::assign_convert!(m, Mock::new(1, &calls));
    m.assign_convert(Mock::new(2, &calls));
    assert_eq!(m.unwrap::<Mock>().tag(), 2);
    assert_eq!(calls.count(Call::Drop, 1), 1);
    assert_eq!(calls.count(Call::Clone, 2), 0);
}

struct Exception {
    what: &'static str,
}
struct RuntimeError {
    base: Exception,
}
struct LogicError {
    base: Exception,
}

class!(Exception);
class!(RuntimeError: Exception => base);
class!(LogicError: Exception => base);

fn runtime(what: &'static str) -> RuntimeError {
    RuntimeError {
        base: Exception { what },
    }
}

#[test]
fn derived_matching() {
    let m: Mixed![RuntimeError, i32, char, LogicError] = Mixed::new(runtime("err"));

    assert!(m.is::<Exception>());
    assert!(!m.is_exact::<Exception>());
    assert!(m.is::<RuntimeError>());
    assert!(m.is_exact::<RuntimeError>());
    assert!(!m.is::<LogicError>());
    assert!(!m.is::<i32>());
    assert_eq!(m.unwrap::<Exception>().what, "err");
    assert_eq!(m.get_as::<Exception>().map(|e| e.what), Some("err"));
    assert!(m.get_as::<LogicError>().is_none());
}

#[test]
fn derived_mutation() {
    let calls = CallCounter::default();
    let mut m: Mixed![i32, DerivedMock] = Mixed::new(DerivedMock::new(1, &calls));

    m.unwrap_mut::<Mock>().set_tag(10);
    assert_eq!(m.unwrap_exact::<DerivedMock, _>().base.tag(), 10);

    m.on_mut::<Mock>(|mock| mock.set_tag(11))
        .on_exact_mut::<i32, _>(|_| unreachable!());
    assert_eq!(m.get_as::<Mock>().map(Mock::tag), Some(11));

    if let Some(mock) = m.get_as_mut::<Mock>() {
        mock.set_tag(12);
    }
    assert_eq!(m.unwrap::<Mock>().tag(), 12);
}

struct Payload(u64);
class!(Payload);

#[test]
fn same_named_classes_stay_distinct() {
    let m: Mixed![Payload, i32] = Mixed::new(Payload(0x4142_4344_4546_4748));
    {
        #[allow(dead_code)]
        struct Payload([u8; 8]);
        class!(Payload);

        assert!(!m.is::<Payload>());
        assert!(m.get_as::<Payload>().is_none());
        assert_eq!(m.map(t![when::<Payload, _>(|_| 1), otherwise(|| 0)]), 0);
    }
    assert!(m.is_exact::<Payload>());
    assert_eq!(m.unwrap::<Payload>().0, 0x4142_4344_4546_4748);
}

#[test]
fn scoped_callbacks() {
    let m: Mixed![RuntimeError, i32] = Mixed::new(runtime("scoped"));
    let mut seen = Vec::new();
    m.on::<Exception>(|e| seen.push(e.what))
        .on::<i32>(|_| seen.push("int"))
        .on_exact::<RuntimeError, _>(|e| seen.push(e.base.what));
    assert_eq!(seen, ["scoped", "scoped"]);
}

struct A;
struct B;
struct C;
class!(A, B, C);

fn classify(m: &Mixed![A, B, C]) -> char {
    m.map(t![
        when::<A, _>(|_| 'a'),
        when::<B, _>(|_| 'b'),
        otherwise(|| 'c'),
    ])
}

#[test]
fn exhaustive_map() {
    assert_eq!(classify(&Mixed::new(A)), 'a');
    assert_eq!(classify(&Mixed::new(B)), 'b');
    assert_eq!(classify(&Mixed::new(C)), 'c');

    let m: Mixed![RuntimeError, i32, char, LogicError] = Mixed::new('x');
    let kind = m.map(t![
        when::<Exception, _>(|e| e.what.len()),
        when_exact::<i32, _>(|_| 1),
        when_exact::<char, _>(|_| 2),
    ]);
    assert_eq!(kind, 2);
}

#[test]
fn dispatch_runs_first_match() {
    let m: Mixed![RuntimeError, i32, char, LogicError] = Mixed::new(LogicError {
        base: Exception { what: "logic" },
    });
    let hits = RefCell::new(Vec::new());
    m.dispatch(t![
        when_exact::<LogicError, _>(|_| hits.borrow_mut().push("logic")),
        when::<Exception, _>(|_| hits.borrow_mut().push("exception")),
        otherwise(|| hits.borrow_mut().push("other")),
    ]);
    assert_eq!(*hits.borrow(), ["logic"]);
}

#[test]
fn by_value_access() {
    let m: Mixed![i32, String, char] = Mixed::new('z');
    let rest = m.try_unwrap::<i32, _>().err().unwrap();
    let rest = rest.try_unwrap::<String, _>().err().unwrap();
    assert_eq!(rest.into_inner(), 'z');

    let single: Mixed![u8] = 3.into();
    assert_eq!(*single + 1, 4);
}

#[test]
fn value_semantics() {
    type M = Mixed![i32, String];
    let values: [M; 3] = [
        Mixed::new(2),
        Mixed::new(String::from("a")),
        Mixed::new(2),
    ];
    assert_eq!(values[0], values[2]);
    assert!(values[0] < values[1]);
    let unique: HashSet<&M> = values.iter().collect();
    assert_eq!(unique.len(), 2);
    assert_eq!(format!("{:?}", values[1]), "\"a\"");
    assert_eq!(values[1].to_string(), "a");
    assert_eq!(values[1].type_name(), std::any::type_name::<String>());
}
