// Rule engine

use crate::{
    FieldDescriptor, RuleDefinitionError, RuleKind, Scalar, ValidationError, Verify, VerifyError,
    compare, matches_pattern, split,
};

/// Verify a record against the rules declared on its fields.
///
/// Fields are checked in declaration order. Within a field the order is
/// `required`, then `regx`, then the bound rules in [`RuleKind::BOUNDS`]
/// order. The first failure ends the whole call; nothing after it is
/// evaluated.
///
/// A field that is empty and not `required` skips its pattern and bound
/// rules: an absent optional value is never out of bounds.
///
/// A value whose kind differs from the field's declared kind is a
/// [`RuleDefinitionError::KindMismatch`], whatever rules the field has.
pub fn verify<R: Verify>(record: &R) -> Result<(), VerifyError> {
    for field in R::fields() {
        verify_field(record, field).inspect_err(|error| match error {
            VerifyError::Invalid(violation) => tracing::debug!(
                field = violation.field,
                rule = %violation.rule,
                "field failed validation"
            ),
            VerifyError::Definition(definition) => tracing::warn!(
                field = field.name,
                error = %definition,
                "broken rule definition"
            ),
        })?;
    }
    Ok(())
}

fn verify_field<R>(record: &R, field: &FieldDescriptor<R>) -> Result<(), VerifyError> {
    let value = (field.value)(record);
    if !value.conforms_to(field.kind) {
        return Err(RuleDefinitionError::KindMismatch {
            field: field.name,
            declared: field.kind,
        }
        .into());
    }
    let kind = field.kind.scalar();
    let empty = value.is_empty();
    let mut needs_value = false;

    if let Some(message) = field.rule(RuleKind::Required) {
        if empty {
            return Err(ValidationError::new(field.name, RuleKind::Required, message).into());
        }
        needs_value = true;
    }

    if let Some(rule) = field.entry(RuleKind::Pattern)
        && !empty
    {
        let parsed = split(rule.raw)?;
        if !field.kind.supports(RuleKind::Pattern) {
            return Err(RuleDefinitionError::Unsupported {
                field: field.name,
                rule: RuleKind::Pattern,
                kind,
            }
            .into());
        }
        tracing::trace!(field = field.name, pattern = parsed.argument, "matching pattern");
        if let Some(Scalar::Str(text)) = value.present() {
            matches_pattern(field.name, text, &parsed, rule.pattern)?;
        }
    }

    for rule in RuleKind::BOUNDS {
        let Some(raw) = field.rule(rule) else {
            continue;
        };
        let parsed = split(raw)?;
        if empty && !needs_value {
            continue;
        }
        if let Some(scalar) = value.present() {
            tracing::trace!(field = field.name, rule = %rule, bound = parsed.argument, "checking bound");
            compare(field.name, kind, scalar, rule, &parsed)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldKind, FieldValue, IntoFieldValue, PatternCache, Rule, ScalarKind};

    struct Person {
        name: String,
        age: i64,
        other: String,
        gender: Option<bool>,
    }

    fn name(p: &Person) -> FieldValue<'_> {
        p.name.field_value()
    }
    fn age(p: &Person) -> FieldValue<'_> {
        p.age.field_value()
    }
    fn other(p: &Person) -> FieldValue<'_> {
        p.other.field_value()
    }
    fn gender(p: &Person) -> FieldValue<'_> {
        p.gender.field_value()
    }

    static PERSON_FIELDS: [FieldDescriptor<Person>; 4] = [
        FieldDescriptor {
            name: "name",
            kind: <String as IntoFieldValue>::KIND,
            rules: &[
                Rule::new(RuleKind::Required, "用户名不能为空"),
                Rule::new(RuleKind::MinLength, "5:用户名最小长度不能小于5"),
                Rule::new(RuleKind::MaxLength, "10:用户名最大长度不能超过10"),
            ],
            value: name,
        },
        FieldDescriptor {
            name: "age",
            kind: <i64 as IntoFieldValue>::KIND,
            rules: &[
                Rule::new(RuleKind::Required, "年龄不能为空"),
                Rule::new(RuleKind::GreaterOrEqual, "18:年龄应当大于18岁"),
                Rule::new(RuleKind::LessOrEqual, "100:年龄应该小于等于100岁"),
            ],
            value: age,
        },
        FieldDescriptor {
            name: "other",
            kind: <String as IntoFieldValue>::KIND,
            rules: &[Rule::new(
                RuleKind::Pattern,
                "^hello:\\d{3,5}$\\:其他字段正则校验失败",
            )],
            value: other,
        },
        FieldDescriptor {
            name: "gender",
            kind: <Option<bool> as IntoFieldValue>::KIND,
            rules: &[Rule::new(RuleKind::Required, "性别不能为空")],
            value: gender,
        },
    ];

    impl Verify for Person {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &PERSON_FIELDS
        }
    }

    fn person() -> Person {
        Person {
            name: "nick123".to_string(),
            age: 24,
            other: "hello:123".to_string(),
            gender: Some(false),
        }
    }

    fn message(person: &Person) -> String {
        match verify(person) {
            Err(VerifyError::Invalid(error)) => error.message,
            other => panic!("expected a violation, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(verify(&person()).is_ok());
        assert!(person().verify().is_ok());
    }

    #[test]
    fn test_required_failures() {
        let mut p = person();
        p.name.clear();
        assert_eq!(message(&p), "用户名不能为空");

        let mut p = person();
        p.age = 0;
        assert_eq!(message(&p), "年龄不能为空");

        let mut p = person();
        p.gender = None;
        assert_eq!(message(&p), "性别不能为空");
    }

    #[test]
    fn test_present_false_satisfies_required_optional() {
        let mut p = person();
        p.gender = Some(false);
        assert!(verify(&p).is_ok());
    }

    #[test]
    fn test_length_bounds() {
        let mut p = person();
        p.name = "nick".to_string();
        assert_eq!(message(&p), "用户名最小长度不能小于5");

        p.name = "nick1234567890".to_string();
        assert_eq!(message(&p), "用户名最大长度不能超过10");
    }

    #[test]
    fn test_numeric_bounds() {
        let mut p = person();
        p.age = 18;
        assert!(verify(&p).is_ok());

        p.age = 17;
        assert_eq!(message(&p), "年龄应当大于18岁");

        p.age = 101;
        assert_eq!(message(&p), "年龄应该小于等于100岁");
    }

    #[test]
    fn test_pattern() {
        let mut p = person();
        p.other = "hello:123456".to_string();
        assert_eq!(message(&p), "其他字段正则校验失败");
    }

    #[test]
    fn test_empty_optional_field_skips_pattern() {
        let mut p = person();
        p.other = String::new();
        assert!(verify(&p).is_ok());
    }

    #[test]
    fn test_first_failure_wins_across_fields() {
        let mut p = person();
        p.name = "nick".to_string();
        p.age = 17;
        p.other = "bye".to_string();
        p.gender = None;
        assert_eq!(message(&p), "用户名最小长度不能小于5");

        let error = verify(&p).unwrap_err();
        assert_eq!(error.field(), Some("name"));
        assert_eq!(error.violation().map(|v| v.rule), Some(RuleKind::MinLength));
    }

    struct Limits {
        score: Option<u32>,
        ratio: f64,
    }

    fn score(l: &Limits) -> FieldValue<'_> {
        l.score.field_value()
    }
    fn ratio(l: &Limits) -> FieldValue<'_> {
        l.ratio.field_value()
    }

    static LIMIT_FIELDS: [FieldDescriptor<Limits>; 2] = [
        FieldDescriptor {
            name: "score",
            kind: <Option<u32> as IntoFieldValue>::KIND,
            rules: &[
                Rule::new(RuleKind::GreaterThan, "10:score must exceed 10"),
                Rule::new(RuleKind::LessThan, "20:score must be under 20"),
            ],
            value: score,
        },
        FieldDescriptor {
            name: "ratio",
            kind: <f64 as IntoFieldValue>::KIND,
            rules: &[Rule::new(RuleKind::LessOrEqual, "1.0:ratio must not exceed 1")],
            value: ratio,
        },
    ];

    impl Verify for Limits {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &LIMIT_FIELDS
        }
    }

    #[test]
    fn test_absent_optional_skips_bounds() {
        let limits = Limits {
            score: None,
            ratio: 0.0,
        };
        assert!(verify(&limits).is_ok());
    }

    #[test]
    fn test_present_optional_is_compared() {
        let limits = Limits {
            score: Some(0),
            ratio: 0.5,
        };
        let error = verify(&limits).unwrap_err();
        assert_eq!(error.to_string(), "score must exceed 10");

        let limits = Limits {
            score: Some(15),
            ratio: 1.5,
        };
        assert_eq!(verify(&limits).unwrap_err().to_string(), "ratio must not exceed 1");
    }

    struct Broken {
        code: String,
        count: i32,
    }

    fn code(b: &Broken) -> FieldValue<'_> {
        b.code.field_value()
    }
    fn count(b: &Broken) -> FieldValue<'_> {
        b.count.field_value()
    }

    static BROKEN_FIELDS: [FieldDescriptor<Broken>; 2] = [
        FieldDescriptor {
            name: "code",
            kind: <String as IntoFieldValue>::KIND,
            rules: &[
                Rule::new(RuleKind::MinLength, "5:code is too short"),
                Rule::new(RuleKind::MaxLength, "3:code is too long"),
            ],
            value: code,
        },
        FieldDescriptor {
            name: "count",
            kind: <i32 as IntoFieldValue>::KIND,
            rules: &[Rule::new(RuleKind::GreaterThan, "ten:must exceed ten")],
            value: count,
        },
    ];

    impl Verify for Broken {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &BROKEN_FIELDS
        }
    }

    #[test]
    fn test_min_length_is_checked_before_max_length() {
        let broken = Broken {
            code: "abcd".to_string(),
            count: 0,
        };
        assert_eq!(verify(&broken).unwrap_err().to_string(), "code is too short");
    }

    #[test]
    fn test_unparsable_bound_only_surfaces_when_checked() {
        let broken = Broken {
            code: String::new(),
            count: 0,
        };
        assert!(verify(&broken).is_ok());

        let broken = Broken {
            code: String::new(),
            count: 5,
        };
        let error = verify(&broken).unwrap_err();
        assert!(error.is_definition());
        assert_eq!(error.field(), Some("count"));
    }

    struct Malformed {
        note: String,
    }

    fn note(m: &Malformed) -> FieldValue<'_> {
        m.note.field_value()
    }

    static MALFORMED_FIELDS: [FieldDescriptor<Malformed>; 1] = [FieldDescriptor {
        name: "note",
        kind: <String as IntoFieldValue>::KIND,
        rules: &[Rule::new(RuleKind::MaxLength, "no separator here")],
        value: note,
    }];

    impl Verify for Malformed {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &MALFORMED_FIELDS
        }
    }

    #[test]
    fn test_malformed_metadata_is_reported_even_when_empty() {
        let error = verify(&Malformed {
            note: String::new(),
        })
        .unwrap_err();
        assert_eq!(
            error,
            VerifyError::Definition(RuleDefinitionError::Format {
                raw: "no separator here".to_string()
            })
        );
    }

    struct Mislabeled {
        v: String,
    }

    fn mislabeled_v(m: &Mislabeled) -> FieldValue<'_> {
        m.v.field_value()
    }

    static MISLABELED_FIELDS: [FieldDescriptor<Mislabeled>; 1] = [FieldDescriptor {
        name: "v",
        kind: FieldKind::Scalar(ScalarKind::Int),
        rules: &[Rule::new(RuleKind::LessThan, "3:v must be below 3")],
        value: mislabeled_v,
    }];

    impl Verify for Mislabeled {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &MISLABELED_FIELDS
        }
    }

    #[test]
    fn test_value_must_match_declared_kind() {
        // the declaration itself is sound, only the accessor disagrees with it
        assert!(crate::audit::<Mislabeled>().is_ok());

        for v in ["", "abc"] {
            let error = verify(&Mislabeled { v: v.to_string() }).unwrap_err();
            assert_eq!(
                error,
                VerifyError::Definition(RuleDefinitionError::KindMismatch {
                    field: "v",
                    declared: FieldKind::Scalar(ScalarKind::Int),
                })
            );
        }
    }

    struct Coupon {
        code: Option<String>,
    }

    fn coupon_code(c: &Coupon) -> FieldValue<'_> {
        c.code.field_value()
    }

    static COUPON_PATTERN: PatternCache = PatternCache::new();

    static COUPON_FIELDS: [FieldDescriptor<Coupon>; 1] = [FieldDescriptor {
        name: "code",
        kind: <Option<String> as IntoFieldValue>::KIND,
        rules: &[Rule::pattern("[A-Z0-9]{4,8}:code must be 4 to 8 capitals or digits", &COUPON_PATTERN)],
        value: coupon_code,
    }];

    impl Verify for Coupon {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &COUPON_FIELDS
        }
    }

    #[test]
    fn test_pattern_is_compiled_once_per_rule() {
        assert!(verify(&Coupon { code: None }).is_ok());
        assert!(COUPON_PATTERN.compiled().is_none());

        assert!(verify(&Coupon { code: Some("SPRING24".to_string()) }).is_ok());
        let compiled = COUPON_PATTERN.compiled().map(|regex| regex as *const regex::Regex);
        assert!(compiled.is_some());

        let error = verify(&Coupon { code: Some("spring".to_string()) }).unwrap_err();
        assert_eq!(error.to_string(), "code must be 4 to 8 capitals or digits");
        assert_eq!(
            COUPON_PATTERN.compiled().map(|regex| regex as *const regex::Regex),
            compiled
        );
    }
}
