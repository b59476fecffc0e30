//! Localized prompt templates.
//!
//! A [`TemplateBundle`] holds every prompt the conversation flow can
//! emit, in both languages. A built-in bilingual default ships with the
//! binary; the active bundle can be swapped at runtime by the template
//! provider. Missing or empty prompts in a provider bundle are filled
//! from the defaults here, so the engine always sees fully populated
//! text and never special-cases absent prompts.

use serde::{Deserialize, Serialize};

use crate::model::{Lang, Offer};

/// Best-effort bilingual apology sent when message handling fails.
pub const APOLOGY: &str =
    "عذراً، حدث خطأ. يرجى المحاولة مرة أخرى.\nSorry, an error occurred. Please try again.";

/// The full set of prompts for one language.
///
/// Parameterized prompts use `{number}`, `{offer}`, and `{name}`
/// placeholders, rendered through the `*_for` methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LangTexts {
    pub choose_lang: String,
    pub welcome: String,
    pub loading_offers: String,
    pub list_header: String,
    pub list_row: String,
    pub list_footer: String,
    pub no_offers: String,
    pub no_offers_ask_name: String,
    pub ask_name: String,
    pub ask_phone: String,
    pub thank: String,
    pub thank_no_offers: String,
    pub send_number: String,
    pub valid_number: String,
    pub invalid_choice: String,
    pub invalid_lang: String,
    pub yes_response: String,
    pub no_response: String,
    pub ask_details: String,
    pub updates_confirmed: String,
    pub updates_declined: String,
}

impl Default for LangTexts {
    fn default() -> Self {
        // serde(default) lands here for absent fields; empty strings are
        // patched in fill_missing.
        Self {
            choose_lang: String::new(),
            welcome: String::new(),
            loading_offers: String::new(),
            list_header: String::new(),
            list_row: String::new(),
            list_footer: String::new(),
            no_offers: String::new(),
            no_offers_ask_name: String::new(),
            ask_name: String::new(),
            ask_phone: String::new(),
            thank: String::new(),
            thank_no_offers: String::new(),
            send_number: String::new(),
            valid_number: String::new(),
            invalid_choice: String::new(),
            invalid_lang: String::new(),
            yes_response: String::new(),
            no_response: String::new(),
            ask_details: String::new(),
            updates_confirmed: String::new(),
            updates_declined: String::new(),
        }
    }
}

impl LangTexts {
    /// Render the ask-for-name prompt for a chosen offer.
    pub fn ask_name_for(&self, number: usize, offer: &str) -> String {
        self.ask_name
            .replace("{number}", &number.to_string())
            .replace("{offer}", offer)
    }

    /// Render the ask-for-phone prompt for a collected name.
    pub fn ask_phone_for(&self, name: &str) -> String {
        self.ask_phone.replace("{name}", name)
    }

    /// Replace every empty field with the corresponding fallback text.
    fn fill_missing(&mut self, fallback: &LangTexts) {
        let pairs: Vec<(&mut String, &String)> = vec![
            (&mut self.choose_lang, &fallback.choose_lang),
            (&mut self.welcome, &fallback.welcome),
            (&mut self.loading_offers, &fallback.loading_offers),
            (&mut self.list_header, &fallback.list_header),
            (&mut self.list_row, &fallback.list_row),
            (&mut self.list_footer, &fallback.list_footer),
            (&mut self.no_offers, &fallback.no_offers),
            (&mut self.no_offers_ask_name, &fallback.no_offers_ask_name),
            (&mut self.ask_name, &fallback.ask_name),
            (&mut self.ask_phone, &fallback.ask_phone),
            (&mut self.thank, &fallback.thank),
            (&mut self.thank_no_offers, &fallback.thank_no_offers),
            (&mut self.send_number, &fallback.send_number),
            (&mut self.valid_number, &fallback.valid_number),
            (&mut self.invalid_choice, &fallback.invalid_choice),
            (&mut self.invalid_lang, &fallback.invalid_lang),
            (&mut self.yes_response, &fallback.yes_response),
            (&mut self.no_response, &fallback.no_response),
            (&mut self.ask_details, &fallback.ask_details),
            (&mut self.updates_confirmed, &fallback.updates_confirmed),
            (&mut self.updates_declined, &fallback.updates_declined),
        ];
        for (dst, fb) in pairs {
            if dst.is_empty() {
                dst.clone_from(fb);
            }
        }
    }
}

/// The complete active prompt set, both languages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateBundle {
    pub ar: LangTexts,
    pub en: LangTexts,
}

impl Default for TemplateBundle {
    fn default() -> Self {
        Self {
            ar: default_ar(),
            en: default_en(),
        }
    }
}

impl TemplateBundle {
    /// Prompts for the given language.
    pub fn texts(&self, lang: Lang) -> &LangTexts {
        match lang {
            Lang::Ar => &self.ar,
            Lang::En => &self.en,
        }
    }

    /// Prompts for the session language, falling back to Arabic when
    /// the language has not been chosen yet.
    pub fn texts_or_ar(&self, lang: Option<Lang>) -> &LangTexts {
        self.texts(lang.unwrap_or(Lang::Ar))
    }

    /// Fill empty fields from the built-in defaults, so downstream code
    /// never sees a blank prompt.
    pub fn with_defaults(mut self) -> Self {
        let defaults = TemplateBundle::default();
        self.ar.fill_missing(&defaults.ar);
        self.en.fill_missing(&defaults.en);
        self
    }

    /// Render the numbered offers listing for the given language, or
    /// the no-offers notice when the list is empty.
    pub fn offers_list(&self, offers: &[Offer], lang: Lang) -> String {
        let texts = self.texts(lang);
        if offers.is_empty() {
            return texts.no_offers.clone();
        }

        let mut out = String::new();
        out.push_str(&texts.list_header);
        out.push('\n');
        for (i, offer) in offers.iter().enumerate() {
            let number = i + 1;
            let emoji = match i {
                0 => "💎",
                1 => "🌊",
                _ => "🏢",
            };
            let row = texts
                .list_row
                .replace("{number}", &number.to_string())
                .replace("{offer}", offer.text(lang));
            out.push_str(&format!("{number}️⃣ {row} {emoji}\n"));
        }
        out.push_str(&texts.list_footer);
        out
    }
}

fn default_ar() -> LangTexts {
    LangTexts {
        choose_lang: "أهلاً بك 🌟\nرجاء اختر اللغة:\n1 - العربية 🇸🇦\n2 - English 🇬🇧\n\nWelcome 🌟\nPlease choose language:\n1 - العربية 🇸🇦\n2 - English 🇬🇧".into(),
        welcome: "مرحبا بك في العقارية 🌟\nنقدم عروض مميزة\nأرسل أي رقم لعرض العروض".into(),
        loading_offers: "⏳ جاري تحميل العروض...".into(),
        list_header: "القائمة:".into(),
        list_row: "عرض رقم {number}: {offer}".into(),
        list_footer: "أرسل أي رقم لاختيار العرض".into(),
        no_offers: "عذراً، لا توجد عروض متاحة حالياً".into(),
        no_offers_ask_name: "عذراً، لا توجد عروض متاحة حالياً 📋\nلكن يمكننا إرسال العروض الجديدة لك مباشرة\nبرجاء كتابة اسمك".into(),
        ask_name: "تمام ✅ اخترت عرض رقم {number}\n{offer}\nبرجاء كتابة اسمك فقط".into(),
        ask_phone: "شكرًا لك {name}.\nالآن أرسل رقم جوالك".into(),
        thank: "شكرًا لك 🌹 سيتم التواصل معك قريبًا".into(),
        thank_no_offers: "شكرًا لك 🌹\nتم تسجيل بياناتك وسنرسل لك العروض الجديدة مباشرة عند توفرها".into(),
        send_number: "أرسل رقم لعرض العروض".into(),
        valid_number: "أرسل رقم صالح".into(),
        invalid_choice: "الرجاء إرسال رقم صحيح (1 أو 2)".into(),
        invalid_lang: "الرجاء إرسال 1 للعربية أو 2 للإنجليزية".into(),
        yes_response: "شكراً لردك 🙏\nحتى نساعدك بشكل أفضل، ممكن تشاركنا تفاصيل العقار\n(الموقع، نوع العقار، والسعر المتوقع).\n\nاطمئن، لن يتم الاتصال بك هاتفياً،\nوسيكون التواصل حصراً عبر الواتساب وبالوقت الذي يناسبك.\n\nأرسل 1 لإرسال تفاصيل العقار".into(),
        no_response: "ممتاز، شكراً لتوضيحك 🌿\nإذا أحببت، يمكننا أن نرسل لك من وقت لآخر المشاريع الجديدة\nوالفرص العقارية المناسبة عبر الواتساب فقط.\n\nلن يتم أي تواصل عبر مكالمات،\nوالقرار دائماً بيدك إن رغبت بالمتابعة أو التوقف.\n\nأرسل 1 للموافقة على التحديثات\nأرسل 2 للرفض".into(),
        ask_details: "ممتاز! يرجى إرسال تفاصيل العقار:\n- الموقع\n- نوع العقار (فيلا، شقة، أرض، إلخ)\n- المساحة\n- السعر المتوقع\n- أي تفاصيل إضافية".into(),
        updates_confirmed: "شكراً لك! تم تسجيلك في قائمة التحديثات 📋\nستصلك العروض الجديدة والفرص العقارية عبر الواتساب فقط".into(),
        updates_declined: "لا مشكلة، شكراً لك! 🙏\nإذا غيرت رأيك في المستقبل، يمكنك التواصل معنا".into(),
    }
}

fn default_en() -> LangTexts {
    LangTexts {
        choose_lang: "Welcome 🌟\nPlease choose language:\n1 - العربية 🇸🇦\n2 - English 🇬🇧\n\nأهلاً بك 🌟\nرجاء اختر اللغة:\n1 - العربية 🇸🇦\n2 - English 🇬🇧".into(),
        welcome: "Welcome to Real Estate 🌟\nWe offer great deals\nSend any number to view offers".into(),
        loading_offers: "⏳ Loading offers...".into(),
        list_header: "List:".into(),
        list_row: "Offer {number}: {offer}".into(),
        list_footer: "Send any number to choose an offer".into(),
        no_offers: "Sorry, no offers available at the moment".into(),
        no_offers_ask_name: "Sorry, no offers are available at the moment 📋\nBut we can send you new offers directly\nPlease enter your name".into(),
        ask_name: "Great ✅ You chose Offer {number}\n{offer}\nPlease enter your name".into(),
        ask_phone: "Thank you {name}.\nNow send your phone number".into(),
        thank: "Thank you 🌹 Our sales team will contact you".into(),
        thank_no_offers: "Thank you 🌹\nYour information has been registered and we will send you new offers directly when available".into(),
        send_number: "Send a number to view offers".into(),
        valid_number: "Send a valid number".into(),
        invalid_choice: "Please send a valid number (1 or 2)".into(),
        invalid_lang: "Please send 1 for Arabic or 2 for English".into(),
        yes_response: "Thank you for your reply 🙏\nTo help you better, please share a few details about your property\n(location, type, and expected price).\n\nRest assured, we will not call you by phone.\nAll communication will remain through WhatsApp, at a time convenient for you.\n\nSend 1 to send property details".into(),
        no_response: "Thank you for clarifying 🌿\nIf you'd like, we can share with you from time to time the latest projects\nand property opportunities through WhatsApp only.\n\nNo calls, no interruptions — you decide if and when to continue.\n\nSend 1 to receive updates\nSend 2 to decline".into(),
        ask_details: "Excellent! Please send property details:\n- Location\n- Property type (villa, apartment, land, etc.)\n- Area\n- Expected price\n- Any additional details".into(),
        updates_confirmed: "Thank you! You've been added to our updates list 📋\nYou'll receive new offers and property opportunities via WhatsApp only".into(),
        updates_declined: "No problem, thank you! 🙏\nIf you change your mind in the future, feel free to contact us".into(),
    }
}
