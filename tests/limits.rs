//! Lists at and past the 256-variant limit.

#![recursion_limit = "1024"]

use exl::{mixed::repr::SumList, tag::MAX_VARIANTS, Mixed};

type L1<T> = (u8, T);
type L4<T> = L1<L1<L1<L1<T>>>>;
type L16<T> = L4<L4<L4<L4<T>>>>;
type L64<T> = L16<L16<L16<L16<T>>>>;
type L255<T> = L64<L64<L64<L16<L16<L16<L4<L4<L4<L1<L1<L1<T>>>>>>>>>>>>;

/// 256 variants, the last one a `char`.
type Full = L255<(char, ())>;
/// One variant too many.
type Over = L1<Full>;

#[test]
fn last_of_256_variants() {
    assert_eq!(<Full as SumList>::LEN, MAX_VARIANTS);

    let m: Mixed<Full> = Mixed::new('z');
    assert_eq!(m.tag(), 255);
    assert_eq!(m.get::<char, _>(), Some(&'z'));
}

#[test]
fn longer_lists_exceed_the_limit() {
    assert_eq!(<Over as SumList>::LEN, MAX_VARIANTS + 1);
    assert!(<Over as SumList>::LEN > MAX_VARIANTS);
}
