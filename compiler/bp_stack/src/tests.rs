use super::*;

fn depth(n: u32) -> u32 {
    if n == 0 {
        0
    } else {
        ensure_sufficient_stack(|| 1 + depth(n - 1))
    }
}

#[test]
fn deep_recursion_completes() {
    assert_eq!(depth(100_000), 100_000);
}

#[test]
fn returns_closure_value() {
    assert_eq!(ensure_sufficient_stack(|| 7), 7);
}
