//! The bundled seed catalog. Only Cairo, Giza and Luxor carry places;
//! the remaining governorates are listed by name so they can still be
//! selected (and extended through discovery).
use super::models::{Governorate, LocalizedString, Place};

struct PlaceSeed<'a> {
    id: &'a str,
    name: [&'a str; 3],
    images: &'a [&'a str],
    short: [&'a str; 3],
    long: Option<[&'a str; 3]>,
    rating: f32,
    price: Option<&'a str>,
    contact: Option<&'a str>,
    maps: &'a str,
}

fn localized([en, fr, ar]: [&str; 3]) -> LocalizedString {
    LocalizedString::new(en, fr, ar)
}

fn place(seed: PlaceSeed) -> Place {
    Place {
        id: seed.id.to_string(),
        name: localized(seed.name),
        images: seed.images.iter().map(|s| s.to_string()).collect(),
        short_description: localized(seed.short),
        long_description: seed.long.map(localized),
        rating: seed.rating,
        average_price: seed.price.map(str::to_string),
        contact_number: seed.contact.map(str::to_string),
        google_maps_url: seed.maps.to_string(),
        ai_generated: false,
    }
}

fn governorate(id: &str, name: [&str; 3]) -> Governorate {
    Governorate {
        id: id.to_string(),
        name: localized(name),
        heritage: vec![],
        restaurants: vec![],
        cafes: vec![],
        hotels: vec![],
    }
}

pub fn governorates() -> Vec<Governorate> {
    let mut cairo = governorate("cairo", ["Cairo", "Le Caire", "القاهرة"]);
    cairo.heritage = vec![
        place(PlaceSeed {
            id: "cai-h-1",
            name: ["The Egyptian Museum", "Le Musée égyptien", "المتحف المصري"],
            images: &[
                "https://images.picsum.photos/id/1/1024/768.jpg",
                "https://images.picsum.photos/id/2/1024/768.jpg",
            ],
            short: [
                "Home to an extensive collection of ancient Egyptian antiquities.",
                "Abrite une vaste collection d'antiquités égyptiennes.",
                "يضم مجموعة واسعة من الآثار المصرية القديمة.",
            ],
            long: Some([
                "Located in Tahrir Square, the Egyptian Museum houses over 120,000 artifacts, including the famous collection of Tutankhamun.",
                "Situé sur la place Tahrir, le musée égyptien abrite plus de 120 000 objets, dont la célèbre collection de Toutankhamon.",
                "يقع المتحف المصري في ميدان التحرير، ويضم أكثر من 120 ألف قطعة أثرية، بما في ذلك مجموعة توت عنخ آمون الشهيرة.",
            ]),
            rating: 4.8,
            price: None,
            contact: Some("+20 2 25796948"),
            maps: "https://maps.app.goo.gl/kG1YJ4x2qZ8e7f6t5",
        }),
        place(PlaceSeed {
            id: "cai-h-2",
            name: ["Khan el-Khalili", "Khan el-Khalili", "خان الخليلي"],
            images: &["https://images.picsum.photos/id/4/1024/768.jpg"],
            short: [
                "A famous bazaar and souq in the historic center of Cairo.",
                "Un célèbre bazar et souk dans le centre historique du Caire.",
                "بازار وسوق شهير في وسط القاهرة التاريخي.",
            ],
            long: None,
            rating: 4.6,
            price: None,
            contact: None,
            maps: "https://maps.app.goo.gl/uQ7X3xZ4sY5p2f6w6",
        }),
    ];
    cairo.restaurants = vec![place(PlaceSeed {
        id: "cai-r-1",
        name: ["Abou El Sid", "Abou El Sid", "أبو السيد"],
        images: &["https://images.picsum.photos/id/10/1024/768.jpg"],
        short: [
            "Authentic Egyptian cuisine in an ornate, traditional setting.",
            "Cuisine égyptienne authentique dans un cadre orné et traditionnel.",
            "مأكولات مصرية أصيلة في أجواء تقليدية مزخرفة.",
        ],
        long: None,
        rating: 4.5,
        price: Some("$$$"),
        contact: Some("+20 2 27359640"),
        maps: "https://maps.app.goo.gl/9tHq8fX7uY6o9zGk7",
    })];
    cairo.cafes = vec![place(PlaceSeed {
        id: "cai-c-1",
        name: ["El Fishawy Cafe", "Café El Fishawy", "قهوة الفيشاوي"],
        images: &["https://images.picsum.photos/id/20/1024/768.jpg"],
        short: [
            "One of Cairo's oldest and most famous cafes in Khan el-Khalili.",
            "L'un des cafés les plus anciens et les plus célèbres du Caire à Khan el-Khalili.",
            "أحد أقدم وأشهر المقاهي في القاهرة في خان الخليلي.",
        ],
        long: None,
        rating: 4.4,
        price: Some("$$"),
        contact: None,
        maps: "https://maps.app.goo.gl/C2rYjL3xZ4w5aB6v7",
    })];
    cairo.hotels = vec![place(PlaceSeed {
        id: "cai-ht-1",
        name: ["Marriott Mena House", "Marriott Mena House", "فندق ماريوت مينا هاوس"],
        images: &["https://images.picsum.photos/id/30/1024/768.jpg"],
        short: [
            "A historic palace hotel with spectacular views of the pyramids.",
            "Un hôtel-palais historique avec des vues spectaculaires sur les pyramides.",
            "فندق قصر تاريخي بإطلالات خلابة على الأهرامات.",
        ],
        long: None,
        rating: 4.8,
        price: Some("$$$$"),
        contact: Some("+20 2 33773222"),
        maps: "https://maps.app.goo.gl/tZ5fX6w7rYp8L3s9a",
    })];

    let mut giza = governorate("giza", ["Giza", "Gizeh", "الجيزة"]);
    giza.heritage = vec![place(PlaceSeed {
        id: "giz-h-1",
        name: [
            "Giza Pyramid Complex",
            "Complexe de pyramides de Gizeh",
            "مجمع أهرامات الجيزة",
        ],
        images: &["https://images.picsum.photos/id/40/1024/768.jpg"],
        short: [
            "Includes the Great Pyramid, Khafre, Menkaure, and the Great Sphinx.",
            "Comprend la Grande Pyramide, Khéphren, Mykérinos et le Grand Sphinx.",
            "يضم الهرم الأكبر وخفرع ومنقرع وأبو الهول العظيم.",
        ],
        long: None,
        rating: 4.9,
        price: None,
        contact: None,
        maps: "https://maps.app.goo.gl/M5dYkR3eW2p4Z1a99",
    })];

    let mut luxor = governorate("luxor", ["Luxor", "Louxor", "الأقصر"]);
    luxor.heritage = vec![place(PlaceSeed {
        id: "lux-h-1",
        name: [
            "Karnak Temple Complex",
            "Complexe du temple de Karnak",
            "مجمع معابد الكرنك",
        ],
        images: &["https://images.picsum.photos/id/50/1024/768.jpg"],
        short: [
            "A vast mix of decayed temples, chapels, pylons, and other buildings.",
            "Un vaste mélange de temples en ruines, de chapelles, de pylônes et d'autres bâtiments.",
            "مزيج واسع من المعابد المتهالكة والمصليات والأبراج والمباني الأخرى.",
        ],
        long: None,
        rating: 4.9,
        price: None,
        contact: Some("+20 95 2370637"),
        maps: "https://maps.app.goo.gl/hG9jF8yE7zD6k4A8A",
    })];

    let mut all = vec![cairo, giza, luxor];
    all.extend(
        [
            ("aswan", ["Aswan", "Assouan", "أسوان"]),
            ("sharm_el_sheikh", ["Sharm El-Sheikh", "Charm el-Cheikh", "شرم الشيخ"]),
            ("hurghada", ["Hurghada", "Hurghada", "الغردقة"]),
            ("alexandria", ["Alexandria", "Alexandrie", "الإسكندرية"]),
            ("suez", ["Suez", "Suez", "السويس"]),
            ("port_said", ["Port Said", "Port-Saïd", "بورسعيد"]),
            ("ismailia", ["Ismailia", "Ismaïlia", "الإسماعيلية"]),
            ("damietta", ["Damietta", "Damiette", "دمياط"]),
            ("marsa_matrouh", ["Marsa Matrouh", "Marsa Matrouh", "مرسى مطروح"]),
            ("fayoum", ["Fayoum", "Fayoum", "الفيوم"]),
            ("minya", ["Minya", "Minya", "المنيا"]),
            ("assiut", ["Assiut", "Assiout", "أسيوط"]),
            ("beni_suef", ["Beni Suef", "Beni Souef", "بني سويف"]),
            ("kafr_el_sheikh", ["Kafr El Sheikh", "Kafr el-Cheikh", "كفر الشيخ"]),
            ("sohag", ["Sohag", "Sohag", "سوهاج"]),
        ]
        .into_iter()
        .map(|(id, name)| governorate(id, name)),
    );
    all
}
