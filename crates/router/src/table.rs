//! The application's route table.
//!
//! One entry per path pattern. An entry holds its access variants in
//! declaration order; the navigator renders with the first variant the
//! session satisfies.

use serde::Serialize;
use vetcard_core::Role;

use crate::error::RouteTableError;
use crate::guard::Access;
use crate::layout::LayoutKind;
use crate::page::Page;
use crate::path::{PathPattern, RouteParams};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct RouteVariant {
    pub access: Access,
    pub layout: LayoutKind,
}

impl RouteVariant {
    pub fn new(access: Access, layout: LayoutKind) -> Self {
        Self { access, layout }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub pattern: PathPattern,
    pub page: Page,
    pub variants: Vec<RouteVariant>,
}

/// A matched entry together with the captured placeholder values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: RouteParams,
}

struct Declaration {
    pattern: String,
    page: Page,
    variant: Option<RouteVariant>,
}

/// Collects route groups and folds them into a [`RouteTable`].
///
/// Declaring a path in several groups adds one variant per group, in the
/// order the groups were declared. Errors surface from [`build`](Self::build).
#[derive(Default)]
pub struct RouteTableBuilder {
    declarations: Vec<Declaration>,
    groups: Vec<Vec<String>>,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path in `routes` gets the variant `(access, layout)`.
    pub fn group(mut self, access: Access, layout: LayoutKind, routes: &[(&str, Page)]) -> Self {
        let variant = RouteVariant::new(access, layout);
        let mut seen = Vec::with_capacity(routes.len());
        for (pattern, page) in routes {
            seen.push(pattern.to_string());
            self.declarations.push(Declaration {
                pattern: pattern.to_string(),
                page: *page,
                variant: Some(variant),
            });
        }
        self.groups.push(seen);
        self
    }

    /// Declare a single path with an explicit variant list.
    pub fn route(mut self, pattern: &str, page: Page, variants: &[RouteVariant]) -> Self {
        if variants.is_empty() {
            self.declarations.push(Declaration {
                pattern: pattern.to_string(),
                page,
                variant: None,
            });
        }
        for variant in variants {
            self.declarations.push(Declaration {
                pattern: pattern.to_string(),
                page,
                variant: Some(*variant),
            });
        }
        self.groups.push(vec![pattern.to_string()]);
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        for group in &self.groups {
            for (i, pattern) in group.iter().enumerate() {
                if group[..i].iter().any(|p| same_path(p, pattern)) {
                    return Err(RouteTableError::DuplicateRoute {
                        pattern: pattern.clone(),
                    });
                }
            }
        }

        let mut entries: Vec<RouteEntry> = Vec::new();
        for declaration in self.declarations {
            let Some(variant) = declaration.variant else {
                return Err(RouteTableError::NoVariants {
                    pattern: declaration.pattern,
                });
            };

            match entries
                .iter_mut()
                .find(|e| same_path(e.pattern.as_str(), &declaration.pattern))
            {
                Some(entry) if entry.page != declaration.page => {
                    return Err(RouteTableError::PageConflict {
                        pattern: declaration.pattern,
                        existing: entry.page,
                        conflicting: declaration.page,
                    });
                }
                Some(entry) => entry.variants.push(variant),
                None => entries.push(RouteEntry {
                    pattern: PathPattern::parse(&declaration.pattern)?,
                    page: declaration.page,
                    variants: vec![variant],
                }),
            }
        }

        Ok(RouteTable { entries })
    }
}

fn same_path(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new()
    }

    /// The vetcard application routes.
    pub fn application() -> Result<Self, RouteTableError> {
        let shared = [
            ("/articles", Page::Articles),
            ("/products", Page::Products),
            ("/products/:id", Page::ProductDetails),
            ("/specialists", Page::Specialists),
        ];

        Self::builder()
            .group(
                Access::Public,
                LayoutKind::Bare,
                &[
                    ("/register", Page::Register),
                    ("/login", Page::Login),
                    ("/forgot-password", Page::ForgotPassword),
                ],
            )
            .group(
                Access::Public,
                LayoutKind::Public,
                &[("/", Page::Root), ("/about", Page::About), ("/support", Page::Support)],
            )
            .group(Access::Public, LayoutKind::Conditional, &shared)
            .group(
                Access::only(Role::Veterinarian),
                LayoutKind::Common,
                &[
                    ("/vet/mydata", Page::VetMyData),
                    ("/vet/mydata/edit", Page::VetMyData),
                    ("/vet/cabinet", Page::VetCabinet),
                    ("/articles", Page::Articles),
                    ("/products", Page::Products),
                    ("/products/:id", Page::ProductDetails),
                    ("/my-products", Page::MyProducts),
                    ("/specialists", Page::Specialists),
                ],
            )
            .group(
                Access::only(Role::Partner),
                LayoutKind::Partner,
                &[
                    ("/partner/mydata", Page::PartnerMyData),
                    ("/partner/cabinet", Page::PartnerCabinet),
                    ("/articles", Page::Articles),
                    ("/products", Page::Products),
                    ("/products/:id", Page::ProductDetails),
                    ("/my-products", Page::MyProducts),
                    ("/specialists", Page::Specialists),
                ],
            )
            .group(
                Access::only(Role::Owner),
                LayoutKind::Owner,
                &[
                    ("/dashboard", Page::Dashboard),
                    ("/userprofile", Page::UserProfile),
                    ("/mypets", Page::MyPets),
                    ("/add-pet", Page::AddPet),
                    ("/mypets/edit/:id", Page::EditPet),
                    ("/reminders", Page::Reminders),
                    ("/appointments", Page::Appointments),
                    ("/consultations", Page::Consultations),
                    ("/articles", Page::Articles),
                    ("/products", Page::Products),
                    ("/products/:id", Page::ProductDetails),
                    ("/my-products", Page::MyProducts),
                    ("/specialists", Page::Specialists),
                ],
            )
            .group(
                Access::AnyAuthenticated,
                LayoutKind::Common,
                &[
                    ("/assistant", Page::Assistant),
                    ("/articles", Page::Articles),
                    ("/products", Page::Products),
                    ("/products/:id", Page::ProductDetails),
                    ("/specialists", Page::Specialists),
                ],
            )
            .group(
                Access::only(Role::Admin),
                LayoutKind::Common,
                &[
                    ("/admin", Page::AdminPanel),
                    ("/admin/users/:userId", Page::AdminUserProfile),
                ],
            )
            .build()
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Find the entry for a normalized path. Literal patterns win over
    /// parameterized ones; otherwise declaration order decides.
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_>> {
        let matching = |parameterized: bool| {
            self.entries
                .iter()
                .filter(|e| e.pattern.is_parameterized() == parameterized)
                .find_map(|entry| entry.pattern.matches(path).map(|params| RouteMatch { entry, params }))
        };
        matching(false).or_else(|| matching(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> RouteTable {
        RouteTable::application().unwrap()
    }

    #[test]
    fn application_table_builds() {
        let table = app();
        assert!(table.entries().len() >= 25);
        assert!(table.entries().iter().all(|e| !e.variants.is_empty()));
    }

    #[test]
    fn shared_paths_keep_group_order() {
        let table = app();
        let articles = table.lookup("/articles").unwrap().entry;
        let accesses: Vec<_> = articles.variants.iter().map(|v| v.access).collect();
        assert_eq!(
            accesses,
            [
                Access::Public,
                Access::only(Role::Veterinarian),
                Access::only(Role::Partner),
                Access::only(Role::Owner),
                Access::AnyAuthenticated,
            ]
        );
        assert_eq!(articles.variants[0].layout, LayoutKind::Conditional);
    }

    #[test]
    fn my_products_has_no_public_variant() {
        let table = app();
        let entry = table.lookup("/my-products").unwrap().entry;
        assert_eq!(entry.variants.len(), 3);
        assert!(entry.variants.iter().all(|v| !v.access.is_public()));
    }

    #[test]
    fn lookup_captures_params() {
        let table = app();
        let hit = table.lookup("/admin/users/42").unwrap();
        assert_eq!(hit.entry.page, Page::AdminUserProfile);
        assert_eq!(hit.params.get("userId"), Some("42"));

        let edit = table.lookup("/mypets/edit/7").unwrap();
        assert_eq!(edit.entry.page, Page::EditPet);
    }

    #[test]
    fn vet_edit_path_reuses_my_data_page() {
        assert_eq!(app().lookup("/vet/mydata/edit").unwrap().entry.page, Page::VetMyData);
    }

    #[test]
    fn unknown_path_has_no_entry() {
        assert!(app().lookup("/nope").is_none());
        assert!(app().lookup("/admin/users").is_none());
    }

    #[test]
    fn duplicate_in_one_group_is_rejected() {
        let err = RouteTable::builder()
            .group(
                Access::Public,
                LayoutKind::Public,
                &[("/about", Page::About), ("/About", Page::About)],
            )
            .build()
            .unwrap_err();
        assert_eq!(err, RouteTableError::DuplicateRoute { pattern: "/About".into() });
    }

    #[test]
    fn conflicting_pages_are_rejected() {
        let err = RouteTable::builder()
            .group(Access::Public, LayoutKind::Public, &[("/about", Page::About)])
            .group(Access::AnyAuthenticated, LayoutKind::Common, &[("/about", Page::Support)])
            .build()
            .unwrap_err();
        assert!(matches!(err, RouteTableError::PageConflict { .. }));
    }

    #[test]
    fn route_without_variants_is_rejected() {
        let err = RouteTable::builder().route("/x", Page::About, &[]).build().unwrap_err();
        assert_eq!(err, RouteTableError::NoVariants { pattern: "/x".into() });
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let err = RouteTable::builder()
            .group(Access::Public, LayoutKind::Public, &[("about", Page::About)])
            .build()
            .unwrap_err();
        assert!(matches!(err, RouteTableError::InvalidPattern { .. }));
    }
}
