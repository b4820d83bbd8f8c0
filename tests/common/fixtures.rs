// Page fixtures

use portfolio::dom::{Document, Element};

/// A full portfolio page with handles to the elements tests poke at
pub struct PageFixture {
    pub document: Document,
    pub loading_screen: Element,
    pub navbar: Element,
    pub nav_menu: Element,
    pub mobile_menu: Element,
    pub nav_links: Vec<Element>,
    pub back_to_top: Element,
    pub hero_text: Element,
    pub hero_visual: Element,
    pub typing_command: Element,
    pub terminal_output: Element,
    pub stat_numbers: Vec<Element>,
    pub skill_items: Vec<Element>,
    pub skill_bars: Vec<Element>,
    pub github_profile: Element,
    pub github_repos: Element,
    pub contact_form: Element,
    pub name_field: Element,
    pub email_field: Element,
    pub message_field: Element,
    pub submit_button: Element,
}

pub const SUBMIT_LABEL: &str = "<i class=\"fas fa-paper-plane\"></i> Send Message";

/// (id, top, height) of every section, top to bottom
pub const SECTIONS: &[(&str, f64, f64)] = &[
    ("home", 0.0, 900.0),
    ("about", 900.0, 700.0),
    ("experience", 1600.0, 900.0),
    ("skills", 2500.0, 700.0),
    ("github", 3200.0, 800.0),
    ("contact", 4000.0, 700.0),
];

fn field_group(field: &Element) -> Element {
    Element::new("div")
        .with_class("form-group")
        .with_child(field.clone())
}

impl PageFixture {
    pub fn new() -> Self {
        let nav_links: Vec<Element> = SECTIONS
            .iter()
            .map(|(id, _, _)| {
                Element::new("a")
                    .with_class("nav-link")
                    .with_attr("href", &format!("#{id}"))
                    .with_text(id)
            })
            .collect();
        let nav_menu = nav_links
            .iter()
            .fold(Element::new("ul").with_id("nav-menu").with_class("nav-menu"), |menu, link| {
                menu.with_child(Element::new("li").with_child(link.clone()))
            });
        let mobile_menu = Element::new("div")
            .with_id("mobile-menu")
            .with_class("hamburger")
            .with_child(Element::new("span").with_class("bar"));
        let navbar = Element::new("nav")
            .with_id("navbar")
            .with_class("navbar")
            .with_geometry(0.0, 70.0)
            .with_child(nav_menu.clone())
            .with_child(mobile_menu.clone());

        let loading_screen = Element::new("div").with_id("loading-screen");
        let hero_text = Element::new("div").with_class("hero-text");
        let hero_visual = Element::new("div").with_class("hero-visual");
        let typing_command = Element::new("span").with_id("typing-command");
        let terminal_output = Element::new("div").with_id("terminal-output");

        let stat_numbers: Vec<Element> = ["7", "50", "15"]
            .iter()
            .map(|target| {
                Element::new("span")
                    .with_class("stat-number")
                    .with_attr("data-target", target)
                    .with_text("0")
            })
            .collect();
        let stat_items: Vec<Element> = stat_numbers
            .iter()
            .enumerate()
            .map(|(i, number)| {
                Element::new("div")
                    .with_class("stat-item")
                    .with_geometry(1100.0 + i as f64 * 10.0, 120.0)
                    .with_child(number.clone())
            })
            .collect();

        let skill_bars: Vec<Element> = ["95", "85", "80"]
            .iter()
            .map(|width| {
                Element::new("div")
                    .with_class("skill-progress")
                    .with_attr("data-width", width)
            })
            .collect();
        let skill_items: Vec<Element> = skill_bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                Element::new("div")
                    .with_class("skill-item")
                    .with_geometry(2600.0 + i as f64 * 80.0, 60.0)
                    .with_child(Element::new("div").with_class("skill-bar").with_child(bar.clone()))
            })
            .collect();

        let timeline = Element::new("div")
            .with_class("timeline-item")
            .with_geometry(1700.0, 300.0);

        let github_profile = Element::new("div").with_id("github-profile");
        let github_repos = Element::new("div").with_id("github-repos");

        let name_field = Element::new("input").with_attr("name", "name");
        let email_field = Element::new("input")
            .with_attr("name", "email")
            .with_attr("type", "email");
        let message_field = Element::new("textarea").with_attr("name", "message");
        let submit_button = Element::new("button")
            .with_attr("type", "submit")
            .with_class("btn")
            .with_html(SUBMIT_LABEL);
        let contact_form = Element::new("form")
            .with_id("contact-form")
            .with_child(field_group(&name_field))
            .with_child(field_group(&email_field))
            .with_child(field_group(&message_field))
            .with_child(submit_button.clone());

        let section = |id: &str| {
            let (top, height) = SECTIONS
                .iter()
                .find(|(s, _, _)| *s == id)
                .map(|(_, top, height)| (*top, *height))
                .unwrap_or((0.0, 0.0));
            Element::new("section").with_id(id).with_geometry(top, height)
        };

        let home = section("home")
            .with_child(hero_text.clone())
            .with_child(
                hero_visual
                    .clone()
                    .with_child(typing_command.clone())
                    .with_child(terminal_output.clone()),
            );
        let about = stat_items
            .iter()
            .fold(section("about"), |s, item| s.with_child(item.clone()));
        let experience = section("experience").with_child(timeline);
        let skills = skill_items
            .iter()
            .fold(section("skills"), |s, item| s.with_child(item.clone()));
        let github = section("github")
            .with_child(github_profile.clone())
            .with_child(github_repos.clone());
        let contact = section("contact").with_child(contact_form.clone());
        let back_to_top = Element::new("button").with_id("back-to-top");

        let body = Element::new("body")
            .with_child(loading_screen.clone())
            .with_child(navbar.clone())
            .with_child(home)
            .with_child(about)
            .with_child(experience)
            .with_child(skills)
            .with_child(github)
            .with_child(contact)
            .with_child(back_to_top.clone());

        Self {
            document: Document::from_body(body),
            loading_screen,
            navbar,
            nav_menu,
            mobile_menu,
            nav_links,
            back_to_top,
            hero_text,
            hero_visual,
            typing_command,
            terminal_output,
            stat_numbers,
            skill_items,
            skill_bars,
            github_profile,
            github_repos,
            contact_form,
            name_field,
            email_field,
            message_field,
            submit_button,
        }
    }

    pub fn nav_link(&self, section: &str) -> &Element {
        let href = format!("#{section}");
        self.nav_links
            .iter()
            .find(|l| l.attr("href").as_deref() == Some(href.as_str()))
            .expect("no nav link for section")
    }

    pub fn active_links(&self) -> Vec<String> {
        self.nav_links
            .iter()
            .filter(|l| l.has_class("active"))
            .filter_map(|l| l.attr("href"))
            .collect()
    }

    /// Notification message texts currently on the page
    pub fn notifications(&self) -> Vec<String> {
        self.document
            .select(".notification")
            .into_iter()
            .filter_map(|n| n.select_first("span"))
            .map(|s| s.text())
            .collect()
    }
}
