use nom::{branch::*, bytes::complete::*, character::complete::*, multi::*};
use nom::{error::*, sequence::*, *};
use std::str::FromStr;

/// An unsigned decimal number.
pub fn uint<T: FromStr>(input: &str) -> IResult<&str, T> {
    digit1.map_res(str::parse).parse(input)
}

pub fn t<'s, O, F>(inner: F) -> impl Parser<&'s str, Output = O, Error = Error<&'s str>>
where
    F: Parser<&'s str, Output = O, Error = Error<&'s str>>,
{
    delimited(multispace0, inner, multispace0)
}

pub fn field<'s, O, V>(
    key: &str,
    value: V,
) -> impl Parser<&'s str, Output = O, Error = Error<&'s str>>
where
    V: Parser<&'s str, Output = O, Error = Error<&'s str>>,
{
    preceded(t(tag(key)), t(value))
}

type Gather3Output<OA, OB, OC> = (Option<OA>, Option<OB>, Option<OC>);

/// Runs `inner` parsers in any order, at least one of them at least once.
///
/// Later matches of the same parser overwrite earlier ones.
pub fn gather3<'s, OA, OB, OC, A, B, C>(
    (mut a, mut b, mut c): (A, B, C),
) -> impl Parser<&'s str, Output = Gather3Output<OA, OB, OC>, Error = Error<&'s str>>
where
    A: Parser<&'s str, Output = OA, Error = Error<&'s str>>,
    B: Parser<&'s str, Output = OB, Error = Error<&'s str>>,
    C: Parser<&'s str, Output = OC, Error = Error<&'s str>>,
{
    move |input: &'s str| {
        let mut output = (None, None, None);

        let a = |s| a.parse(s);
        let b = |s| b.parse(s);
        let c = |s| c.parse(s);

        let inner = alt((
            a.map(|o| output.0 = Some(o)),
            b.map(|o| output.1 = Some(o)),
            c.map(|o| output.2 = Some(o)),
        ));

        let (rest, _) = many1(inner).parse(input)?;
        Ok((rest, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn uint_parses_decimal_numbers(n: u64) {
        assert_eq!(uint::<u64>(&n.to_string()), Ok(("", n)));
    }

    #[proptest]
    fn uint_rejects_signs(n: u64) {
        assert!(uint::<u64>(&format!("-{n}")).is_err());
        assert!(uint::<u64>(&format!("+{n}")).is_err());
    }

    #[test]
    fn uint_rejects_overflow() {
        assert!(uint::<u8>("256").is_err());
    }

    #[proptest]
    fn t_trims_surrounding_whitespace(
        n: u32,
        #[strategy("[ \t]*")] l: String,
        #[strategy("[ \t]*")] r: String,
    ) {
        let input = format!("{l}{n}{r}");
        assert_eq!(t(uint::<u32>).parse(&input), Ok(("", n)));
    }

    #[proptest]
    fn field_parses_key_value_pairs(n: u32) {
        let input = format!("key {n}");
        assert_eq!(field("key", uint::<u32>).parse(&input), Ok(("", n)));
    }

    #[proptest]
    fn gather3_accepts_fields_in_any_order(a: u8, b: u16, c: u32) {
        let fields = (field("a", uint::<u8>), field("b", uint::<u16>), field("c", uint::<u32>));
        let input = format!("c {c} a {a} b {b}");
        assert_eq!(gather3(fields).parse(&input), Ok(("", (Some(a), Some(b), Some(c)))));
    }

    #[proptest]
    fn gather3_leaves_missing_fields_empty(b: u16) {
        let fields = (field("a", uint::<u8>), field("b", uint::<u16>), field("c", uint::<u32>));
        let input = format!("b {b}");
        assert_eq!(gather3(fields).parse(&input), Ok(("", (None, Some(b), None))));
    }
}
