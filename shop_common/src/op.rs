//! Tiny macro for forwarding arithmetic operator impls to a newtype's inner value.

#[macro_export]
macro_rules! op {
    (binary $t:ty, $op:ident, $meth:ident) => {
        impl std::ops::$op for $t {
            type Output = Self;

            fn $meth(self, rhs: Self) -> Self::Output {
                Self(std::ops::$op::$meth(self.0, rhs.0))
            }
        }
    };
    (inplace $t:ty, $op:ident, $meth:ident) => {
        impl std::ops::$op for $t {
            fn $meth(&mut self, rhs: Self) {
                std::ops::$op::$meth(&mut self.0, rhs.0)
            }
        }
    };
    (unary $t:ty, $op:ident, $meth:ident) => {
        impl std::ops::$op for $t {
            type Output = Self;

            fn $meth(self) -> Self::Output {
                Self(std::ops::$op::$meth(self.0))
            }
        }
    };
}
