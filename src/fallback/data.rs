//! Bundled datasets used when a live fetch is unavailable.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::i18n::{Catalog, Locale};
use crate::models::{ContentSectionItem, Event, EventType, NewsArticle, StaffMember};

/// Pick the text for `locale` from a `(bg, en)` pair.
fn pick(locale: Locale, (bg, en): (&str, &str)) -> String {
    match locale {
        Locale::Bg => bg.to_string(),
        Locale::En => en.to_string(),
    }
}

fn section(
    locale: Locale,
    id: i64,
    section_key: &str,
    title: Option<(&str, &str)>,
    content: Option<(&str, &str)>,
    image_url: Option<&str>,
) -> ContentSectionItem {
    ContentSectionItem {
        id,
        section_key: section_key.to_string(),
        title: title.map(|t| pick(locale, t)),
        content: content.map(|c| pick(locale, c)),
        image_url: image_url.map(str::to_string),
        position: id,
    }
}

/// Static translations when `/translations` is unavailable.
pub fn translations(locale: Locale) -> BTreeMap<String, String> {
    Catalog::bundled().flat(locale)
}

pub fn staff(locale: Locale) -> Vec<StaffMember> {
    let people: [(&str, (&str, &str), (&str, &str), bool); 5] = [
        (
            "director",
            ("Мария Петрова", "Maria Petrova"),
            ("Директор", "Principal"),
            true,
        ),
        (
            "deputy",
            ("Иван Георгиев", "Ivan Georgiev"),
            ("Заместник-директор", "Deputy Principal"),
            false,
        ),
        (
            "math",
            ("Елена Димитрова", "Elena Dimitrova"),
            ("Учител по математика", "Mathematics Teacher"),
            false,
        ),
        (
            "bulgarian",
            ("Николай Стоянов", "Nikolay Stoyanov"),
            ("Учител по български език и литература", "Bulgarian Language and Literature Teacher"),
            false,
        ),
        (
            "english",
            ("Теодора Илиева", "Teodora Ilieva"),
            ("Учител по английски език", "English Teacher"),
            false,
        ),
    ];

    people
        .into_iter()
        .enumerate()
        .map(|(i, (slug, name, role, is_director))| StaffMember {
            id: i as i64 + 1,
            name: pick(locale, name),
            role: pick(locale, role),
            image_url: format!("/images/staff/{slug}.jpg"),
            email: is_director.then(|| "director@school.bg".to_string()),
            phone: None,
            bio: None,
            is_director,
            is_active: true,
            position: i as i64 + 1,
        })
        .collect()
}

pub fn patron_sections(locale: Locale) -> Vec<ContentSectionItem> {
    vec![
        section(
            locale,
            1,
            "title",
            Some(("Христо Ботев", "Hristo Botev")),
            None,
            None,
        ),
        section(
            locale,
            2,
            "quote",
            None,
            Some((
                "Тоз, който падне в бой за свобода, той не умира.",
                "He who falls in the fight for freedom does not die.",
            )),
            None,
        ),
        section(
            locale,
            3,
            "biography_p1",
            None,
            Some((
                "Христо Ботев е роден на 6 януари 1848 г. в Калофер.",
                "Hristo Botev was born on 6 January 1848 in Kalofer.",
            )),
            None,
        ),
        section(
            locale,
            4,
            "biography_p2",
            None,
            Some((
                "Учи в Одеса, след което работи като учител и журналист.",
                "He studied in Odessa and went on to work as a teacher and journalist.",
            )),
            None,
        ),
        section(
            locale,
            5,
            "biography_p3",
            None,
            Some((
                "Загива на 1 юни 1876 г. във Врачанския балкан.",
                "He died on 1 June 1876 in the Vratsa Balkan mountains.",
            )),
            None,
        ),
        section(locale, 6, "image", None, None, Some("/images/patron/botev.jpg")),
    ]
}

pub fn history_sections(locale: Locale) -> Vec<ContentSectionItem> {
    vec![
        section(
            locale,
            1,
            "founding",
            Some(("Основаване", "Founding")),
            Some((
                "Училището отваря врати през 1923 г. с четири класни стаи.",
                "The school opened its doors in 1923 with four classrooms.",
            )),
            Some("/images/history/1923.jpg"),
        ),
        section(
            locale,
            2,
            "growth",
            Some(("Развитие", "Growth")),
            Some((
                "През 1968 г. училището става средно и получава нова сграда.",
                "In 1968 the school became a secondary school and moved into a new building.",
            )),
            None,
        ),
        section(
            locale,
            3,
            "today",
            Some(("Днес", "Today")),
            Some((
                "Днес в училището учат над 800 ученици.",
                "Today more than 800 students attend the school.",
            )),
            None,
        ),
    ]
}

/// Upcoming events anchored on `today`, so the bundled calendar never looks stale.
pub fn events(locale: Locale, today: NaiveDate) -> Vec<Event> {
    let entries: [(i64, (&str, &str), (&str, &str), &str, &str, EventType); 3] = [
        (
            7,
            ("Родителска среща", "Parent-teacher meeting"),
            ("Среща с класните ръководители.", "Meeting with form teachers."),
            "18:00",
            "19:30",
            EventType::Meeting,
        ),
        (
            14,
            ("Математическа олимпиада", "Mathematics olympiad"),
            ("Училищен кръг на олимпиадата.", "School round of the olympiad."),
            "09:00",
            "12:00",
            EventType::Academic,
        ),
        (
            21,
            ("Есенен концерт", "Autumn concert"),
            ("Концерт на училищния хор.", "Concert by the school choir."),
            "17:00",
            "18:30",
            EventType::Extracurricular,
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (days, title, description, start, end, event_type))| Event {
            id: i as i64 + 1,
            title: pick(locale, title),
            description: pick(locale, description),
            date: (today + Duration::days(days)).format("%Y-%m-%d").to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            event_type,
            location: Some(pick(locale, ("Актовата зала", "Assembly hall"))),
        })
        .collect()
}

pub fn news(locale: Locale) -> Vec<NewsArticle> {
    vec![NewsArticle {
        id: 1,
        title: pick(locale, ("Добре дошли на новия сайт", "Welcome to the new website")),
        excerpt: pick(
            locale,
            (
                "Новият сайт на училището вече е онлайн.",
                "The school's new website is now online.",
            ),
        ),
        content: String::new(),
        image_url: None,
        published_at: "2026-09-15T08:00:00Z".to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasets_are_localized() {
        for locale in Locale::ALL {
            assert!(!staff(locale).is_empty());
            assert!(!patron_sections(locale).is_empty());
            assert!(!history_sections(locale).is_empty());
            assert!(!news(locale).is_empty());
            assert!(!translations(locale).is_empty());
        }
        assert_ne!(staff(Locale::Bg)[0].name, staff(Locale::En)[0].name);
        assert_eq!(staff(Locale::En)[0].role, "Principal");
    }

    #[test]
    fn test_exactly_one_director() {
        assert_eq!(staff(Locale::Bg).iter().filter(|s| s.is_director).count(), 1);
    }

    #[test]
    fn test_events_are_upcoming() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let events = events(Locale::En, today);
        assert_eq!(events[0].date, "2026-10-25");
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
