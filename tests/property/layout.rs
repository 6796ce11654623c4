use appshots::images::{infer_locale_and_device, looks_like_locale, review_key};
use proptest::prelude::*;

fn locale_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{2,3}", proptest::option::of("[A-Z]{2}")).prop_map(|(lang, region)| match region {
        Some(region) => format!("{}-{}", lang, region),
        None => lang,
    })
}

proptest! {
    #[test]
    fn prop_three_segment_paths_yield_locale_and_device(
        locale in locale_strategy(),
        device in "[A-Za-z0-9_]{1,16}",
        id in "[a-z0-9_-]{1,12}",
    ) {
        let relative = format!("{}/{}/{}.png", locale, device, id);
        prop_assert_eq!(infer_locale_and_device(&relative), (locale.clone(), device.clone()));

        let with_backslashes = relative.replace('/', "\\");
        prop_assert_eq!(infer_locale_and_device(&with_backslashes), (locale, device));
    }

    #[test]
    fn prop_locale_shaped_leading_directory_is_a_locale(
        locale in locale_strategy(),
        id in "[a-z0-9]{1,12}",
    ) {
        prop_assert!(looks_like_locale(&locale));
        let (got_locale, got_device) = infer_locale_and_device(&format!("{}/{}.png", locale, id));
        prop_assert_eq!(got_locale, locale);
        prop_assert_eq!(got_device, "");
    }

    #[test]
    fn prop_digit_bearing_directory_is_a_device(
        device in "[A-Za-z]{1,8}[0-9][A-Za-z0-9_]{0,8}",
        id in "[a-z0-9]{1,12}",
    ) {
        let (locale, got_device) = infer_locale_and_device(&format!("{}/{}.png", device, id));
        prop_assert_eq!(locale, "");
        prop_assert_eq!(got_device, device);
    }

    #[test]
    fn prop_review_key_has_three_fields(
        locale in "[a-z]{0,3}",
        device in "[A-Za-z_]{0,10}",
        id in "[a-z]{1,10}",
    ) {
        let key = review_key(&locale, &device, &id);
        let fields: Vec<&str> = key.split('|').collect();
        prop_assert_eq!(fields, vec![locale.as_str(), device.as_str(), id.as_str()]);
    }
}
