//! Content post type (CPT) registry.
//!
//! One declarative description per manageable entity type. The admin console
//! renders its generic Listing and Studio screens from this configuration
//! (served at `GET /api/cpt`), the repository layer uses it to whitelist sort
//! columns and resolve table names, and the delete path uses the
//! [`Dependent`] lists to find rows that still reference an entity.

use serde::Serialize;

use crate::error::CoreError;
use crate::listing::SortOrder;

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Specialty,
    Treatment,
    Destination,
    Hospital,
    Doctor,
    BlogPost,
    Testimonial,
    Video,
    StaticPage,
    Submission,
    Media,
    User,
}

/// Types that carry a draft/published/archived status and are managed
/// through the generic Listing + Studio screens.
pub const PUBLISHABLE: &[ContentType] = &[
    ContentType::Specialty,
    ContentType::Treatment,
    ContentType::Destination,
    ContentType::Hospital,
    ContentType::Doctor,
    ContentType::BlogPost,
    ContentType::Testimonial,
    ContentType::Video,
    ContentType::StaticPage,
];

/// Every registered type, in admin menu order.
pub const ALL: &[ContentType] = &[
    ContentType::Specialty,
    ContentType::Treatment,
    ContentType::Destination,
    ContentType::Hospital,
    ContentType::Doctor,
    ContentType::BlogPost,
    ContentType::Testimonial,
    ContentType::Video,
    ContentType::StaticPage,
    ContentType::Submission,
    ContentType::Media,
    ContentType::User,
];

impl ContentType {
    /// URL segment used by the API (`/api/<key>`) and admin pages (`/admin/<key>`).
    pub fn key(self) -> &'static str {
        match self {
            ContentType::Specialty => "specialties",
            ContentType::Treatment => "treatments",
            ContentType::Destination => "destinations",
            ContentType::Hospital => "hospitals",
            ContentType::Doctor => "doctors",
            ContentType::BlogPost => "blog-posts",
            ContentType::Testimonial => "testimonials",
            ContentType::Video => "videos",
            ContentType::StaticPage => "pages",
            ContentType::Submission => "submissions",
            ContentType::Media => "media",
            ContentType::User => "users",
        }
    }

    /// Singular identifier recorded in `activity_log.entity_type`.
    pub fn entity_type(self) -> &'static str {
        match self {
            ContentType::Specialty => "specialty",
            ContentType::Treatment => "treatment",
            ContentType::Destination => "destination",
            ContentType::Hospital => "hospital",
            ContentType::Doctor => "doctor",
            ContentType::BlogPost => "blog_post",
            ContentType::Testimonial => "testimonial",
            ContentType::Video => "video",
            ContentType::StaticPage => "static_page",
            ContentType::Submission => "submission",
            ContentType::Media => "media",
            ContentType::User => "user",
        }
    }

    /// Database table name.
    pub fn table(self) -> &'static str {
        match self {
            ContentType::Specialty => "specialties",
            ContentType::Treatment => "treatments",
            ContentType::Destination => "destinations",
            ContentType::Hospital => "hospitals",
            ContentType::Doctor => "doctors",
            ContentType::BlogPost => "blog_posts",
            ContentType::Testimonial => "testimonials",
            ContentType::Video => "videos",
            ContentType::StaticPage => "static_pages",
            ContentType::Submission => "submissions",
            ContentType::Media => "media",
            ContentType::User => "users",
        }
    }

    /// Human-readable singular name, used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Specialty => "Specialty",
            ContentType::Treatment => "Treatment",
            ContentType::Destination => "Destination",
            ContentType::Hospital => "Hospital",
            ContentType::Doctor => "Doctor",
            ContentType::BlogPost => "Blog post",
            ContentType::Testimonial => "Testimonial",
            ContentType::Video => "Video",
            ContentType::StaticPage => "Page",
            ContentType::Submission => "Submission",
            ContentType::Media => "Media item",
            ContentType::User => "User",
        }
    }

    pub fn label_plural(self) -> &'static str {
        match self {
            ContentType::Specialty => "Specialties",
            ContentType::Treatment => "Treatments",
            ContentType::Destination => "Destinations",
            ContentType::Hospital => "Hospitals",
            ContentType::Doctor => "Doctors",
            ContentType::BlogPost => "Blog posts",
            ContentType::Testimonial => "Testimonials",
            ContentType::Video => "Videos",
            ContentType::StaticPage => "Pages",
            ContentType::Submission => "Submissions",
            ContentType::Media => "Media",
            ContentType::User => "Users",
        }
    }

    /// Column holding the row's display title.
    pub fn title_column(self) -> &'static str {
        match self {
            ContentType::BlogPost | ContentType::Video | ContentType::StaticPage => "title",
            ContentType::Testimonial => "patient_name",
            ContentType::Media => "original_name",
            ContentType::User => "email",
            _ => "name",
        }
    }

    /// Whether rows are addressed by a unique slug on the public site.
    pub fn has_slug(self) -> bool {
        matches!(
            self,
            ContentType::Specialty
                | ContentType::Treatment
                | ContentType::Destination
                | ContentType::Hospital
                | ContentType::Doctor
                | ContentType::BlogPost
                | ContentType::Video
                | ContentType::StaticPage
        )
    }

    pub fn is_publishable(self) -> bool {
        PUBLISHABLE.contains(&self)
    }

    /// Look a type up by its URL key.
    pub fn from_key(key: &str) -> Option<ContentType> {
        ALL.iter().copied().find(|ct| ct.key() == key)
    }

    /// Like [`ContentType::from_key`] but restricted to publishable types.
    pub fn publishable_from_key(key: &str) -> Result<ContentType, CoreError> {
        PUBLISHABLE
            .iter()
            .copied()
            .find(|ct| ct.key() == key)
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown content type '{key}'"))
            })
    }

    /// Inbound references that block deletion of a row of this type.
    pub fn dependents(self) -> &'static [Dependent] {
        match self {
            ContentType::Specialty => SPECIALTY_DEPENDENTS,
            ContentType::Treatment => TREATMENT_DEPENDENTS,
            ContentType::Destination => DESTINATION_DEPENDENTS,
            ContentType::Hospital => HOSPITAL_DEPENDENTS,
            ContentType::Doctor => DOCTOR_DEPENDENTS,
            _ => &[],
        }
    }

    /// Listing screen configuration.
    pub fn listing(self) -> ListingConfig {
        listing_config(self)
    }

    /// Studio (editor) screen configuration.
    pub fn studio(self) -> StudioConfig {
        StudioConfig {
            fields: studio_fields(self),
        }
    }

    /// Resolve the requested sort column, defaulting to the configured one.
    pub fn resolve_sort(self, requested: Option<&str>) -> Result<&'static str, CoreError> {
        let listing = self.listing();
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(listing.default_sort),
            Some(col) => listing
                .sortable
                .iter()
                .copied()
                .find(|c| *c == col)
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Cannot sort {} by '{col}'. Sortable columns: {}",
                        self.key(),
                        listing.sortable.join(", ")
                    ))
                }),
        }
    }

    /// Full serializable description for the admin console.
    pub fn config(self) -> CptConfig {
        CptConfig {
            key: self.key(),
            entity_type: self.entity_type(),
            label: self.label(),
            label_plural: self.label_plural(),
            has_slug: self.has_slug(),
            publishable: self.is_publishable(),
            listing: self.listing(),
            studio: self.studio(),
        }
    }
}

/// Configuration of every registered type.
pub fn registry() -> Vec<CptConfig> {
    ALL.iter().map(|ct| ct.config()).collect()
}

// ---------------------------------------------------------------------------
// Dependents
// ---------------------------------------------------------------------------

/// A foreign-key reference into a content type, scanned before deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    /// Plural label shown in the conflict message ("treatments").
    pub entity: &'static str,
    /// Table holding the foreign key.
    pub table: &'static str,
    /// Foreign-key column pointing at the entity being deleted.
    pub column: &'static str,
    /// For junction tables: the owning table and the junction column pointing at it.
    pub via: Option<(&'static str, &'static str)>,
    /// Column used to label example rows.
    pub label_column: &'static str,
}

impl Dependent {
    const fn direct(
        entity: &'static str,
        table: &'static str,
        column: &'static str,
        label_column: &'static str,
    ) -> Self {
        Self {
            entity,
            table,
            column,
            via: None,
            label_column,
        }
    }

    const fn junction(
        entity: &'static str,
        table: &'static str,
        column: &'static str,
        owner_table: &'static str,
        owner_column: &'static str,
        label_column: &'static str,
    ) -> Self {
        Self {
            entity,
            table,
            column,
            via: Some((owner_table, owner_column)),
            label_column,
        }
    }

    /// `SELECT COUNT(*)` of referencing rows; binds the referenced id as `$1`.
    pub fn count_sql(&self) -> String {
        format!(
            "SELECT COUNT(*)::BIGINT FROM {} WHERE {} = $1",
            self.table, self.column
        )
    }

    /// Labels of up to `limit` referencing rows; binds the referenced id as `$1`.
    pub fn examples_sql(&self, limit: i64) -> String {
        match self.via {
            None => format!(
                "SELECT {label}::TEXT FROM {table} WHERE {col} = $1 ORDER BY {label} LIMIT {limit}",
                label = self.label_column,
                table = self.table,
                col = self.column,
            ),
            Some((owner, owner_col)) => format!(
                "SELECT o.{label}::TEXT FROM {table} j JOIN {owner} o ON o.id = j.{owner_col} \
                 WHERE j.{col} = $1 ORDER BY o.{label} LIMIT {limit}",
                label = self.label_column,
                table = self.table,
                col = self.column,
            ),
        }
    }
}

const SPECIALTY_DEPENDENTS: &[Dependent] = &[
    Dependent::direct("treatments", "treatments", "specialty_id", "name"),
    Dependent::direct("doctors", "doctors", "specialty_id", "name"),
    Dependent::junction(
        "hospitals",
        "hospital_specialties",
        "specialty_id",
        "hospitals",
        "hospital_id",
        "name",
    ),
    Dependent::direct("blog posts", "blog_posts", "specialty_id", "title"),
    Dependent::direct("videos", "videos", "specialty_id", "title"),
];

const TREATMENT_DEPENDENTS: &[Dependent] = &[
    Dependent::junction(
        "doctors",
        "doctor_treatments",
        "treatment_id",
        "doctors",
        "doctor_id",
        "name",
    ),
    Dependent::direct("testimonials", "testimonials", "treatment_id", "patient_name"),
    Dependent::direct("videos", "videos", "treatment_id", "title"),
];

const DESTINATION_DEPENDENTS: &[Dependent] = &[
    Dependent::direct("hospitals", "hospitals", "destination_id", "name"),
    Dependent::direct("doctors", "doctors", "destination_id", "name"),
];

const HOSPITAL_DEPENDENTS: &[Dependent] = &[
    Dependent::direct("doctors", "doctors", "hospital_id", "name"),
    Dependent::direct("testimonials", "testimonials", "hospital_id", "patient_name"),
    Dependent::direct("videos", "videos", "hospital_id", "title"),
];

const DOCTOR_DEPENDENTS: &[Dependent] = &[Dependent::direct(
    "testimonials",
    "testimonials",
    "doctor_id",
    "patient_name",
)];

// ---------------------------------------------------------------------------
// Listing configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ColumnDef {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Title,
    Status,
    Date,
    Number,
    Image,
    Rating,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterDef {
    /// Query parameter name sent to the list endpoint.
    pub param: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
    /// Fixed set of values.
    Options { values: &'static [&'static str] },
    /// Options loaded from another CPT's list endpoint.
    Relation { cpt: &'static str },
    Text,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingConfig {
    pub columns: Vec<ColumnDef>,
    pub filters: Vec<FilterDef>,
    pub sortable: &'static [&'static str],
    pub default_sort: &'static str,
    pub default_order: SortOrder,
    pub search_columns: &'static [&'static str],
    /// Bulk actions offered by the bulk bar.
    pub bulk_actions: &'static [&'static str],
}

const CONTENT_BULK_ACTIONS: &[&str] = &["publish", "draft", "archive", "delete"];
const SUBMISSION_BULK_ACTIONS: &[&str] = &["new", "contacted", "in_progress", "closed", "delete"];

fn col(key: &'static str, label: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef { key, label, kind }
}

fn status_filter() -> FilterDef {
    FilterDef {
        param: "status",
        label: "Status",
        kind: FilterKind::Options {
            values: crate::status::CONTENT_STATUSES,
        },
    }
}

fn relation_filter(param: &'static str, label: &'static str, cpt: &'static str) -> FilterDef {
    FilterDef {
        param,
        label,
        kind: FilterKind::Relation { cpt },
    }
}

fn listing_config(ct: ContentType) -> ListingConfig {
    use ColumnKind::*;

    let common_tail = || {
        vec![
            col("status", "Status", Status),
            col("updated_at", "Last modified", Date),
        ]
    };

    match ct {
        ContentType::Specialty => ListingConfig {
            columns: [vec![col("name", "Name", Title), col("sort_order", "Order", Number)], common_tail()].concat(),
            filters: vec![status_filter()],
            sortable: &["name", "sort_order", "status", "created_at", "updated_at"],
            default_sort: "sort_order",
            default_order: SortOrder::Asc,
            search_columns: &["name", "description"],
            bulk_actions: CONTENT_BULK_ACTIONS,
        },
        ContentType::Treatment => ListingConfig {
            columns: [
                vec![
                    col("featured_image", "", Image),
                    col("name", "Name", Title),
                    col("specialty_name", "Specialty", Text),
                    col("price_from", "Price from", Number),
                ],
                common_tail(),
            ]
            .concat(),
            filters: vec![
                status_filter(),
                relation_filter("specialty_id", "Specialty", "specialties"),
            ],
            sortable: &["name", "price_from", "status", "created_at", "updated_at"],
            default_sort: "updated_at",
            default_order: SortOrder::Desc,
            search_columns: &["name", "summary"],
            bulk_actions: CONTENT_BULK_ACTIONS,
        },
        ContentType::Destination => ListingConfig {
            columns: [
                vec![
                    col("featured_image", "", Image),
                    col("name", "Name", Title),
                    col("country", "Country", Text),
                    col("city", "City", Text),
                ],
                common_tail(),
            ]
            .concat(),
            filters: vec![
                status_filter(),
                FilterDef {
                    param: "country",
                    label: "Country",
                    kind: FilterKind::Text,
                },
            ],
            sortable: &["name", "country", "city", "status", "created_at", "updated_at"],
            default_sort: "name",
            default_order: SortOrder::Asc,
            search_columns: &["name", "country", "city"],
            bulk_actions: CONTENT_BULK_ACTIONS,
        },
        ContentType::Hospital => ListingConfig {
            columns: [
                vec![
                    col("featured_image", "", Image),
                    col("name", "Name", Title),
                    col("destination_name", "Destination", Text),
                    col("rating", "Rating", Rating),
                ],
                common_tail(),
            ]
            .concat(),
            filters: vec![
                status_filter(),
                relation_filter("destination_id", "Destination", "destinations"),
                relation_filter("specialty_id", "Specialty", "specialties"),
            ],
            sortable: &["name", "rating", "established_year", "status", "created_at", "updated_at"],
            default_sort: "name",
            default_order: SortOrder::Asc,
            search_columns: &["name", "summary", "address"],
            bulk_actions: CONTENT_BULK_ACTIONS,
        },
        ContentType::Doctor => ListingConfig {
            columns: [
                vec![
                    col("photo", "", Image),
                    col("name", "Name", Title),
                    col("specialty_name", "Specialty", Text),
                    col("hospital_name", "Hospital", Text),
                    col("experience_years", "Experience", Number),
                ],
                common_tail(),
            ]
            .concat(),
            filters: vec![
                status_filter(),
                relation_filter("specialty_id", "Specialty", "specialties"),
                relation_filter("hospital_id", "Hospital", "hospitals"),
                relation_filter("destination_id", "Destination", "destinations"),
                relation_filter("treatment_id", "Treatment", "treatments"),
            ],
            sortable: &["name", "experience_years", "status", "created_at", "updated_at"],
            default_sort: "name",
            default_order: SortOrder::Asc,
            search_columns: &["name", "title", "qualifications"],
            bulk_actions: CONTENT_BULK_ACTIONS,
        },
        ContentType::BlogPost => ListingConfig {
            columns: [
                vec![
                    col("featured_image", "", Image),
                    col("title", "Title", Title),
                    col("category", "Category", Text),
                    col("author_name", "Author", Text),
                    col("published_at", "Published", Date),
                ],
                common_tail(),
            ]
            .concat(),
            filters: vec![
                status_filter(),
                FilterDef {
                    param: "category",
                    label: "Category",
                    kind: FilterKind::Text,
                },
                relation_filter("specialty_id", "Specialty", "specialties"),
            ],
            sortable: &["title", "category", "published_at", "status", "created_at", "updated_at"],
            default_sort: "updated_at",
            default_order: SortOrder::Desc,
            search_columns: &["title", "excerpt"],
            bulk_actions: CONTENT_BULK_ACTIONS,
        },
        ContentType::Testimonial => ListingConfig {
            columns: [
                vec![
                    col("patient_name", "Patient", Title),
                    col("patient_country", "Country", Text),
                    col("treatment_name", "Treatment", Text),
                    col("rating", "Rating", Rating),
                ],
                common_tail(),
            ]
            .concat(),
            filters: vec![
                status_filter(),
                relation_filter("treatment_id", "Treatment", "treatments"),
                relation_filter("hospital_id", "Hospital", "hospitals"),
                FilterDef {
                    param: "rating",
                    label: "Rating",
                    kind: FilterKind::Options {
                        values: &["1", "2", "3", "4", "5"],
                    },
                },
            ],
            sortable: &["patient_name", "patient_country", "rating", "status", "created_at", "updated_at"],
            default_sort: "created_at",
            default_order: SortOrder::Desc,
            search_columns: &["patient_name", "patient_country", "content"],
            bulk_actions: CONTENT_BULK_ACTIONS,
        },
        ContentType::Video => ListingConfig {
            columns: [
                vec![
                    col("thumbnail", "", Image),
                    col("title", "Title", Title),
                    col("url", "URL", Text),
                ],
                common_tail(),
            ]
            .concat(),
            filters: vec![
                status_filter(),
                relation_filter("treatment_id", "Treatment", "treatments"),
                relation_filter("specialty_id", "Specialty", "specialties"),
                relation_filter("hospital_id", "Hospital", "hospitals"),
            ],
            sortable: &["title", "status", "created_at", "updated_at"],
            default_sort: "created_at",
            default_order: SortOrder::Desc,
            search_columns: &["title", "description"],
            bulk_actions: CONTENT_BULK_ACTIONS,
        },
        ContentType::StaticPage => ListingConfig {
            columns: [
                vec![
                    col("title", "Title", Title),
                    col("slug", "Slug", Text),
                    col("template", "Template", Text),
                ],
                common_tail(),
            ]
            .concat(),
            filters: vec![status_filter()],
            sortable: &["title", "slug", "status", "created_at", "updated_at"],
            default_sort: "title",
            default_order: SortOrder::Asc,
            search_columns: &["title", "content"],
            bulk_actions: CONTENT_BULK_ACTIONS,
        },
        ContentType::Submission => ListingConfig {
            columns: vec![
                col("name", "Name", Title),
                col("email", "Email", Text),
                col("form_type", "Form", Text),
                col("treatment_name", "Treatment", Text),
                col("status", "Status", Status),
                col("created_at", "Received", Date),
            ],
            filters: vec![
                FilterDef {
                    param: "status",
                    label: "Status",
                    kind: FilterKind::Options {
                        values: crate::status::SUBMISSION_STATUSES,
                    },
                },
                FilterDef {
                    param: "form_type",
                    label: "Form",
                    kind: FilterKind::Options {
                        values: FORM_TYPES,
                    },
                },
                relation_filter("treatment_id", "Treatment", "treatments"),
            ],
            sortable: &["name", "email", "form_type", "status", "created_at"],
            default_sort: "created_at",
            default_order: SortOrder::Desc,
            search_columns: &["name", "email", "phone", "message"],
            bulk_actions: SUBMISSION_BULK_ACTIONS,
        },
        ContentType::Media => ListingConfig {
            columns: vec![
                col("url", "", Image),
                col("original_name", "File", Title),
                col("mime_type", "Type", Text),
                col("size_bytes", "Size", Number),
                col("created_at", "Uploaded", Date),
            ],
            filters: vec![FilterDef {
                param: "kind",
                label: "Kind",
                kind: FilterKind::Options {
                    values: &["image", "document"],
                },
            }],
            sortable: &["original_name", "size_bytes", "created_at"],
            default_sort: "created_at",
            default_order: SortOrder::Desc,
            search_columns: &["original_name", "alt_text"],
            bulk_actions: &[],
        },
        ContentType::User => ListingConfig {
            columns: vec![
                col("name", "Name", Title),
                col("email", "Email", Text),
                col("role", "Role", Text),
                col("last_login_at", "Last login", Date),
                col("created_at", "Created", Date),
            ],
            filters: vec![FilterDef {
                param: "role",
                label: "Role",
                kind: FilterKind::Options {
                    values: crate::roles::VALID_ROLES,
                },
            }],
            sortable: &["name", "email", "role", "last_login_at", "created_at"],
            default_sort: "created_at",
            default_order: SortOrder::Desc,
            search_columns: &["name", "email"],
            bulk_actions: &[],
        },
    }
}

/// Valid values of `submissions.form_type`.
pub const FORM_TYPES: &[&str] = &["contact", "quote", "callback"];

// ---------------------------------------------------------------------------
// Studio configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Richtext,
    Number,
    Select,
    Multiselect,
    Image,
    Url,
    Email,
    Date,
    Tags,
    Rating,
    Status,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// For select/multiselect: the CPT key whose rows provide the options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options_from: Option<&'static str>,
    /// For select: fixed option values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [&'static str]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudioConfig {
    pub fields: Vec<FieldDef>,
}

fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef {
        name,
        label,
        kind,
        required: false,
        options_from: None,
        options: None,
    }
}

fn required(mut f: FieldDef) -> FieldDef {
    f.required = true;
    f
}

fn relation(name: &'static str, label: &'static str, kind: FieldKind, cpt: &'static str) -> FieldDef {
    FieldDef {
        options_from: Some(cpt),
        ..field(name, label, kind)
    }
}

fn seo_fields() -> Vec<FieldDef> {
    vec![
        field("meta_title", "SEO title", FieldKind::Text),
        field("meta_description", "SEO description", FieldKind::Textarea),
    ]
}

fn studio_fields(ct: ContentType) -> Vec<FieldDef> {
    use FieldKind::*;

    let status = field("status", "Status", Status);
    match ct {
        ContentType::Specialty => vec![
            required(field("name", "Name", Text)),
            field("slug", "Slug", Text),
            field("description", "Description", Textarea),
            field("icon", "Icon", Image),
            field("sort_order", "Sort order", Number),
            status,
        ],
        ContentType::Treatment => [
            vec![
                required(field("name", "Name", Text)),
                field("slug", "Slug", Text),
                required(relation("specialty_id", "Specialty", Select, "specialties")),
                field("summary", "Summary", Textarea),
                field("content", "Content", Richtext),
                field("price_from", "Price from", Number),
                field("price_to", "Price to", Number),
                field("currency", "Currency", Text),
                field("duration", "Procedure duration", Text),
                field("recovery_time", "Recovery time", Text),
                field("featured_image", "Featured image", Image),
                status,
            ],
            seo_fields(),
        ]
        .concat(),
        ContentType::Destination => [
            vec![
                required(field("name", "Name", Text)),
                field("slug", "Slug", Text),
                required(field("country", "Country", Text)),
                field("city", "City", Text),
                field("summary", "Summary", Textarea),
                field("content", "Content", Richtext),
                field("featured_image", "Featured image", Image),
                status,
            ],
            seo_fields(),
        ]
        .concat(),
        ContentType::Hospital => [
            vec![
                required(field("name", "Name", Text)),
                field("slug", "Slug", Text),
                required(relation("destination_id", "Destination", Select, "destinations")),
                relation("specialty_ids", "Specialties", Multiselect, "specialties"),
                field("summary", "Summary", Textarea),
                field("content", "Content", Richtext),
                field("address", "Address", Textarea),
                field("accreditations", "Accreditations", Tags),
                field("established_year", "Established", Number),
                field("bed_count", "Beds", Number),
                field("rating", "Rating", Number),
                field("featured_image", "Featured image", Image),
                status,
            ],
            seo_fields(),
        ]
        .concat(),
        ContentType::Doctor => [
            vec![
                required(field("name", "Name", Text)),
                field("slug", "Slug", Text),
                field("title", "Title", Text),
                relation("specialty_id", "Specialty", Select, "specialties"),
                relation("hospital_id", "Hospital", Select, "hospitals"),
                relation("destination_id", "Destination", Select, "destinations"),
                relation("treatment_ids", "Treatments", Multiselect, "treatments"),
                field("qualifications", "Qualifications", Textarea),
                field("experience_years", "Years of experience", Number),
                field("languages", "Languages", Tags),
                field("bio", "Biography", Richtext),
                field("photo", "Photo", Image),
                status,
            ],
            seo_fields(),
        ]
        .concat(),
        ContentType::BlogPost => [
            vec![
                required(field("title", "Title", Text)),
                field("slug", "Slug", Text),
                field("excerpt", "Excerpt", Textarea),
                field("content", "Content", Richtext),
                field("category", "Category", Text),
                field("tags", "Tags", Tags),
                relation("specialty_id", "Specialty", Select, "specialties"),
                field("featured_image", "Featured image", Image),
                field("published_at", "Publish date", Date),
                status,
            ],
            seo_fields(),
        ]
        .concat(),
        ContentType::Testimonial => vec![
            required(field("patient_name", "Patient name", Text)),
            field("patient_country", "Country", Text),
            relation("treatment_id", "Treatment", Select, "treatments"),
            relation("hospital_id", "Hospital", Select, "hospitals"),
            relation("doctor_id", "Doctor", Select, "doctors"),
            required(field("rating", "Rating", Rating)),
            required(field("content", "Testimonial", Richtext)),
            field("photo", "Photo", Image),
            field("video_url", "Video URL", Url),
            status,
        ],
        ContentType::Video => vec![
            required(field("title", "Title", Text)),
            field("slug", "Slug", Text),
            required(field("url", "Video URL", Url)),
            field("thumbnail", "Thumbnail", Image),
            field("description", "Description", Richtext),
            relation("treatment_id", "Treatment", Select, "treatments"),
            relation("specialty_id", "Specialty", Select, "specialties"),
            relation("hospital_id", "Hospital", Select, "hospitals"),
            field("duration_secs", "Duration (seconds)", Number),
            status,
        ],
        ContentType::StaticPage => [
            vec![
                required(field("title", "Title", Text)),
                field("slug", "Slug", Text),
                field("content", "Content", Richtext),
                FieldDef {
                    options: Some(PAGE_TEMPLATES),
                    ..field("template", "Template", Select)
                },
                status,
            ],
            seo_fields(),
        ]
        .concat(),
        ContentType::Submission => vec![
            FieldDef {
                options: Some(crate::status::SUBMISSION_STATUSES),
                ..field("status", "Status", Select)
            },
            field("notes", "Internal notes", Textarea),
        ],
        ContentType::Media => vec![field("alt_text", "Alt text", Text)],
        ContentType::User => vec![
            required(field("name", "Name", Text)),
            required(field("email", "Email", Email)),
            FieldDef {
                options: Some(crate::roles::VALID_ROLES),
                ..required(field("role", "Role", Select))
            },
            field("is_active", "Active", Select),
        ],
    }
}

/// Layout templates a static page can be rendered with.
pub const PAGE_TEMPLATES: &[&str] = &["default", "full-width", "landing", "legal"];

/// Serializable configuration for one content type.
#[derive(Debug, Clone, Serialize)]
pub struct CptConfig {
    pub key: &'static str,
    pub entity_type: &'static str,
    pub label: &'static str,
    pub label_plural: &'static str,
    pub has_slug: bool,
    pub publishable: bool,
    pub listing: ListingConfig,
    pub studio: StudioConfig,
}
