// Algebraic property bits declared by weight types.
//
// A weight type returns the union of these bits from `Weight::properties()`.
// The harness in `tester` verifies every declared bit.

/// `times` distributes over `plus` from the left: `a(b + c) = ab + ac`.
pub const LEFT_SEMIRING: u64 = 0x0000_0001;

/// `times` distributes over `plus` from the right: `(a + b)c = ac + bc`.
pub const RIGHT_SEMIRING: u64 = 0x0000_0002;

/// Both left and right distributive.
pub const SEMIRING: u64 = LEFT_SEMIRING | RIGHT_SEMIRING;

/// `times` is commutative.
pub const COMMUTATIVE: u64 = 0x0000_0004;

/// `plus(w, w) = w` for every member `w`.
pub const IDEMPOTENT: u64 = 0x0000_0008;

/// `plus(a, b)` is always `a` or `b`.
pub const PATH: u64 = 0x0000_0010;

const NAMES: [(u64, &str); 5] = [
    (LEFT_SEMIRING, "left_semiring"),
    (RIGHT_SEMIRING, "right_semiring"),
    (COMMUTATIVE, "commutative"),
    (IDEMPOTENT, "idempotent"),
    (PATH, "path"),
];

/// Names of the bits set in `props`, in bit order.
pub fn property_names(props: u64) -> Vec<&'static str> {
    NAMES
        .iter()
        .filter(|(bit, _)| props & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}
