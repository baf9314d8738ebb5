//! Contract violations terminate the process. Each case re-runs this test
//! binary filtered down to itself and checks that the child aborted.
//!
//! Without the `std` feature violations panic from a drop guard instead, and
//! the same cases still expect an abort.

use std::{env, process::Command};

use exl::{class, Mixed, MixedOption, Optional, T};

const CASE: &str = "EXL_FATAL_CASE";

fn expect_abort(name: &str, case: impl FnOnce()) {
    expect_abort_reporting(name, "", case)
}

/// Like `expect_abort`, also requiring `report` in the child's standard error.
fn expect_abort_reporting(name: &str, report: &str, case: impl FnOnce()) {
    if env::var_os(CASE).is_some() {
        case();
        return;
    }

    let exe = env::current_exe().expect("test binary path");
    let output = Command::new(exe)
        .args([name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CASE, name)
        .output()
        .expect("re-run the test binary");
    let status = output.status;
    assert!(!status.success(), "`{name}` finished normally");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(report), "`{name}` did not report {report:?}:\n{stderr}");

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        const SIGABRT: i32 = 6;
        assert_eq!(status.signal(), Some(SIGABRT), "`{name}` exited with {status}");
    }
}

struct Base;
struct Derived {
    base: Base,
}
class!(Base);
class!(Derived: Base => base);

#[test]
fn unwrap_other_variant() {
    expect_abort("unwrap_other_variant", || {
        let m: Mixed![i32, Derived] = Mixed::new(3);
        let _ = m.unwrap::<Base>();
    });
}

#[test]
fn unwrap_base_of_unrelated() {
    expect_abort("unwrap_base_of_unrelated", || {
        let m: Mixed![i32, char] = Mixed::new('c');
        let _ = m.unwrap::<i32>();
    });
}

#[test]
fn unwrap_exact_through_base() {
    expect_abort("unwrap_exact_through_base", || {
        let mut m: Mixed![Derived, Base] = Mixed::new(Derived { base: Base });
        assert!(m.is::<Base>());
        let _ = m.unwrap_exact_mut::<Base, _>();
    });
}

#[test]
fn take_wrong_variant() {
    expect_abort("take_wrong_variant", || {
        let mut opt = MixedOption::<T![i32, char]>::make('c');
        let _ = opt.take::<i32, _>();
    });
}

#[test]
fn take_from_none() {
    expect_abort("take_from_none", || {
        let mut opt = MixedOption::<T![i32, char]>::make_none();
        let _ = opt.take::<char, _>();
    });
}

#[test]
fn unwrap_empty_optional() {
    expect_abort("unwrap_empty_optional", || {
        let opt = Optional::<String>::make_none();
        let _ = opt.unwrap_some();
    });
}

#[cfg(feature = "alloc")]
#[test]
fn dereference_invalid_box() {
    expect_abort("dereference_invalid_box", || {
        let mut boxed = exl::Boxed::make(5);
        let _ = boxed.release();
        std::hint::black_box(*boxed);
    });
}

#[test]
fn panic_during_emplace() {
    const EMPLACE_LINE: u32 = line!() + 5;
    let report = format!("vacant at {}:{EMPLACE_LINE}:", file!());

    expect_abort_reporting("panic_during_emplace", &report, || {
        let mut m: Mixed![String, i32] = Mixed::new(String::from("old"));
        m.emplace::<i32, _>(|| {
            panic!("construction failed")
        });
    });
}

#[test]
fn panic_during_assign_from_clone() {
    struct Brittle;

    impl Clone for Brittle {
        fn clone(&self) -> Self {
            panic!("clone failed")
        }
    }

    expect_abort("panic_during_assign_from_clone", || {
        let mut m: Mixed![String, Brittle] = Mixed::new(String::from("old"));
        let source: Mixed![Brittle] = Mixed::new(Brittle);
        m.clone_assign_from(&source);
    });
}

#[test]
fn violation_is_not_catchable() {
    expect_abort("violation_is_not_catchable", || {
        let _ = std::panic::catch_unwind(|| {
            let m: Mixed![i32, char] = Mixed::new('c');
            let _ = m.unwrap_exact::<i32, _>();
        });
    });
}
