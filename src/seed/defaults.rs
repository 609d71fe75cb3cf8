//! The dataset a fresh installation starts with.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::*;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn announcement(
    id: &str,
    title: &str,
    content: &str,
    category: &str,
    priority: Priority,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Announcement {
    let input = AnnouncementInput {
        title: title.to_string(),
        content: content.to_string(),
        category: category.to_string(),
        priority,
        status: Some(AnnouncementStatus::Published),
        ..Default::default()
    };
    let mut announcement = Announcement::from_input(id.to_string(), input, created_at);
    announcement.updated_at = updated_at;
    announcement
}

pub fn announcements() -> Vec<Announcement> {
    vec![
        announcement(
            "1",
            "School Reopening Announcement",
            "All students are requested to return to school on Monday, September 1st. \
             Please ensure you have completed all your holiday assignments.",
            "emergency",
            Priority::Critical,
            at(2024, 1, 15, 10, 30),
            at(2024, 1, 15, 10, 30),
        ),
        announcement(
            "2",
            "Sports Day Celebration",
            "Annual Sports Day will be held on January 25th. \
             All students must participate in at least one event.",
            "event",
            Priority::Important,
            at(2024, 1, 10, 14, 20),
            at(2024, 1, 12, 9, 15),
        ),
        announcement(
            "3",
            "Parent-Teacher Meeting",
            "Quarterly parent-teacher meeting scheduled for January 30th. \
             Parents are requested to attend.",
            "general",
            Priority::Regular,
            at(2024, 1, 5, 11, 0),
            at(2024, 1, 5, 11, 0),
        ),
    ]
}

fn event(id: &str, title: &str, description: &str, category: &str, start: DateTime<Utc>, image_url: &str) -> Event {
    let input = EventInput {
        title: title.to_string(),
        description: description.to_string(),
        start_time: start,
        end_time: start + Duration::hours(2),
        category: category.to_string(),
        image_url: Some(image_url.to_string()),
        ..Default::default()
    };
    Event::from_input(id.to_string(), input, start - Duration::days(30))
}

pub fn events() -> Vec<Event> {
    vec![
        event(
            "1",
            "Annual Science Fair",
            "Showcase of student science projects with guest judges from local universities.",
            "academic",
            at(2024, 2, 15, 9, 0),
            "https://images.unsplash.com/photo-1532094349884-543bc11b234d?w=400&h=300&fit=crop",
        ),
        event(
            "2",
            "Cultural Festival",
            "Annual cultural festival featuring dance, music, and drama performances.",
            "cultural",
            at(2024, 3, 10, 14, 0),
            "https://images.unsplash.com/photo-1511795409834-ef04bbd61622?w=400&h=300&fit=crop",
        ),
    ]
}

struct TeacherSeed<'a> {
    id: &'a str,
    title: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    gender: &'a str,
    email: &'a str,
    employee_id: &'a str,
    department: &'a str,
    subjects: &'a [&'a str],
    qualification: &'a str,
    bio: &'a str,
    photo_url: &'a str,
}

fn teacher(seed: TeacherSeed<'_>) -> Teacher {
    let input = TeacherInput {
        basic_info: BasicInfo {
            title: seed.title.to_string(),
            first_name: seed.first_name.to_string(),
            last_name: seed.last_name.to_string(),
            gender: seed.gender.to_string(),
            photo_url: Some(seed.photo_url.to_string()),
            ..Default::default()
        },
        contact_info: ContactInfo {
            email: seed.email.to_string(),
            ..Default::default()
        },
        professional_info: ProfessionalInfo {
            employee_id: seed.employee_id.to_string(),
            department: seed.department.to_string(),
            subjects: seed.subjects.iter().map(|s| s.to_string()).collect(),
            grade_levels: vec!["9th".to_string(), "10th".to_string()],
            qualification: Some(seed.qualification.to_string()),
            ..Default::default()
        },
        additional_info: AdditionalInfo {
            bio: Some(seed.bio.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    Teacher::from_input(seed.id.to_string(), input, at(2024, 1, 1, 8, 0))
}

pub fn teachers() -> Vec<Teacher> {
    vec![
        teacher(TeacherSeed {
            id: "1",
            title: "Dr.",
            first_name: "Sarah",
            last_name: "Johnson",
            gender: "Female",
            email: "sarah.johnson@school.com",
            employee_id: "T-001",
            department: "Mathematics",
            subjects: &["Calculus", "Algebra"],
            qualification: "PhD in Mathematics",
            bio: "PhD in Mathematics with 15 years of teaching experience. \
                  Specializes in Calculus and Algebra.",
            photo_url: "https://images.unsplash.com/photo-1582750433449-648ed127bb54?w=200&h=200&fit=crop",
        }),
        teacher(TeacherSeed {
            id: "2",
            title: "Mr.",
            first_name: "David",
            last_name: "Chen",
            gender: "Male",
            email: "david.chen@school.com",
            employee_id: "T-002",
            department: "Science",
            subjects: &["Physics"],
            qualification: "MSc in Physics",
            bio: "MSc in Physics. Passionate about making science fun and accessible to all students.",
            photo_url: "https://images.unsplash.com/photo-1568602471122-7832951cc4c5?w=200&h=200&fit=crop",
        }),
    ]
}

pub fn departments() -> Vec<Department> {
    let created = at(2024, 1, 1, 8, 0);
    [
        ("1", "Science Department", "Focuses on Physics, Chemistry, Biology, and Environmental Science education."),
        ("2", "Mathematics Department", "Dedicated to developing mathematical thinking and problem-solving skills."),
        ("3", "Humanities Department", "Covers History, Geography, Languages, and Social Studies."),
    ]
    .into_iter()
    .map(|(id, name, description)| {
        Department::from_input(
            id.to_string(),
            DepartmentInput {
                name: name.to_string(),
                description: description.to_string(),
            },
            created,
        )
    })
    .collect()
}

pub fn gallery() -> Vec<GalleryItem> {
    let created = at(2024, 1, 1, 8, 0);
    [
        ("1", "https://images.unsplash.com/photo-1523050854058-8df90110c9f1?w=400&h=300&fit=crop", "Annual Sports Day 2023"),
        ("2", "https://images.unsplash.com/photo-1503676260728-1c00da094a0b?w=400&h=300&fit=crop", "Science Lab Session"),
    ]
    .into_iter()
    .map(|(id, image_url, caption)| {
        GalleryItem::from_input(
            id.to_string(),
            GalleryItemInput {
                image_url: image_url.to_string(),
                caption: caption.to_string(),
            },
            created,
        )
    })
    .collect()
}

pub fn messages() -> Vec<Message> {
    vec![
        Message::from_input(
            "1".to_string(),
            MessageInput {
                name: "John Smith".to_string(),
                email: "john@example.com".to_string(),
                subject: "Admission Inquiry".to_string(),
                message: "I would like to inquire about the admission process for grade 10.".to_string(),
            },
            at(2024, 1, 15, 9, 30),
        ),
        Message::from_input(
            "2".to_string(),
            MessageInput {
                name: "Maria Garcia".to_string(),
                email: "maria@example.com".to_string(),
                subject: "Teacher Feedback".to_string(),
                message: "I wanted to provide feedback about my child's progress this semester.".to_string(),
            },
            at(2024, 1, 14, 14, 45),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn defaults_satisfy_their_own_validation() {
        for t in teachers() {
            let input = TeacherInput {
                basic_info: t.basic_info,
                contact_info: t.contact_info,
                professional_info: t.professional_info,
                ..Default::default()
            };
            input.validate().unwrap();
        }
        for g in gallery() {
            GalleryItemInput { image_url: g.image_url, caption: g.caption }
                .validate()
                .unwrap();
        }
        assert!(announcements().iter().all(|a| a.status == AnnouncementStatus::Published));
        assert!(events().iter().all(|e| e.effective_end() > e.start_time));
        assert!(messages().iter().all(|m| !m.read && m.created_at < Utc::now()));
    }
}
