/// Builds a [`Fields`](field/struct.Fields.html) mask from field names.
///
/// ```
/// # #[macro_use] extern crate lifeboat;
/// # fn main() {
/// use lifeboat::{Field, Fields};
///
/// const POSITION: Fields = fields![Latitude, Longitude];
/// assert_eq!(POSITION, Field::Latitude | Field::Longitude);
/// assert_eq!(fields![], Fields::empty());
/// # }
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::empty()
    };
    ($($field:ident),+ $(,)*) => {
        $crate::Fields::empty()$(.union($crate::Field::$field.mask()))+
    };
}

/// Feeds a character into the fixed-point scratch using the fractional bits
/// of `$field`.
macro_rules! number_char {
    ($self:expr, $field:expr, $c:expr, unsigned) => {
        if let Scratch::Number(ref mut fxp) = $self.scratch {
            fxp.push($c, $field.fractional_bits());
        }
    };
    ($self:expr, $field:expr, $c:expr, signed) => {
        if let Scratch::Number(ref mut fxp) = $self.scratch {
            fxp.push_signed($c, $field.fractional_bits());
        }
    };
}

/// Applies `$body` to the satellite slot the GSV group is currently filling,
/// does nothing once the slots are exhausted.
macro_rules! with_satellite {
    ($self:expr, $sat:ident => $body:expr) => {
        match $self.fix.sats.get_mut(usize::from($self.gsv.index())) {
            Some($sat) => $body,
            None => trace!("satellite slot {} exceeds capacity", $self.gsv.index()),
        }
    };
}
