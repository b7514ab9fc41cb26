//! Fixed user-facing strings. Lookups fall back to English and then to
//! the key itself.
use crate::catalog::Language;

pub const RAFIQI_WELCOME: &str = "rafiqiWelcome";
pub const RAFIQI_ERROR: &str = "rafiqiError";
pub const IMAGE_UPLOAD_ERROR: &str = "imageUploadError";
pub const SPEECH_UNSUPPORTED: &str = "speechUnsupported";
pub const DISCOVERY_ERROR: &str = "discoveryError";
pub const DISCOVERY_BUSY: &str = "discoveryBusy";
pub const NO_RESULTS: &str = "noResults";

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    let value = match (language, key) {
        (Language::En, RAFIQI_WELCOME) => {
            "Hello! I'm Rafiqi, your travel companion in Egypt. Ask me anything, or send me a photo of a place."
        }
        (Language::En, RAFIQI_ERROR) => "Sorry, I encountered an error. Please try again.",
        (Language::En, IMAGE_UPLOAD_ERROR) => "The image is too large. Please choose one under 4 MB.",
        (Language::En, SPEECH_UNSUPPORTED) => "Sorry, speech recognition isn't available here.",
        (Language::En, DISCOVERY_ERROR) => "Couldn't find more places right now. Please try again.",
        (Language::En, DISCOVERY_BUSY) => "Already looking for more places...",
        (Language::En, NO_RESULTS) => "No places found.",

        (Language::Fr, RAFIQI_WELCOME) => {
            "Bonjour ! Je suis Rafiqi, votre compagnon de voyage en Égypte. Posez-moi une question ou envoyez-moi la photo d'un lieu."
        }
        (Language::Fr, RAFIQI_ERROR) => "Désolé, une erreur s'est produite. Veuillez réessayer.",
        (Language::Fr, IMAGE_UPLOAD_ERROR) => {
            "L'image est trop volumineuse. Veuillez en choisir une de moins de 4 Mo."
        }
        (Language::Fr, SPEECH_UNSUPPORTED) => {
            "Désolé, la reconnaissance vocale n'est pas disponible ici."
        }
        (Language::Fr, NO_RESULTS) => "Aucun lieu trouvé.",

        (Language::Ar, RAFIQI_WELCOME) => {
            "مرحباً! أنا رفيقي، رفيقك في السفر في مصر. اسألني أي شيء أو أرسل لي صورة لمكان."
        }
        (Language::Ar, RAFIQI_ERROR) => "عذراً، حدث خطأ. يرجى المحاولة مرة أخرى.",
        (Language::Ar, IMAGE_UPLOAD_ERROR) => "الصورة كبيرة جداً. يرجى اختيار صورة أقل من 4 ميغابايت.",
        (Language::Ar, SPEECH_UNSUPPORTED) => "عذراً، التعرف على الكلام غير متاح هنا.",
        (Language::Ar, NO_RESULTS) => "لم يتم العثور على أماكن.",
        _ => return None,
    };
    Some(value)
}

/// Translate `key` into `language`.
pub fn t(language: Language, key: &str) -> String {
    lookup(language, key)
        .or_else(|| lookup(Language::En, key))
        .unwrap_or(key)
        .to_string()
}
