use serde::Serialize;

/// Page components addressable by the route table.
///
/// Rendering a page is the page's own business; the routing layer only
/// decides *which* page and *which* chrome.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    // standalone auth pages
    Register,
    Login,
    ForgotPassword,
    // public
    Root,
    About,
    Support,
    // shared between guests and every role
    Articles,
    Products,
    ProductDetails,
    Specialists,
    MyProducts,
    Assistant,
    // veterinarian
    VetMyData,
    VetCabinet,
    // partner
    PartnerMyData,
    PartnerCabinet,
    // owner
    Dashboard,
    UserProfile,
    MyPets,
    AddPet,
    EditPet,
    Reminders,
    Appointments,
    Consultations,
    // admin
    AdminPanel,
    AdminUserProfile,

    NotFound,
}
