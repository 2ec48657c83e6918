//! Static domain catalog: keyword lists for skill matching and labelled
//! sentences for classifier training. Table order is significant: domain
//! resolution returns the first entry that matches.

#[derive(Debug)]
pub struct DomainProfile {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub weight: f64,
}

#[derive(Debug)]
pub struct TrainingSet {
    pub domain: &'static str,
    pub examples: &'static [&'static str],
}

pub static DOMAINS: &[DomainProfile] = &[
    DomainProfile {
        name: "informatique",
        keywords: &[
            "python", "java", "javascript", "sql", "html", "css", "react", "angular", "vue",
            "node", "php", "c++", "c#", "ruby", "go", "rust", "swift", "kotlin", "scala",
            "docker", "kubernetes", "git", "github", "gitlab", "jenkins", "aws", "azure",
            "mongodb", "postgresql", "mysql", "redis", "elasticsearch", "apache", "nginx",
            "linux", "windows", "macos", "android", "ios", "flutter", "xamarin",
            "machine learning", "deep learning", "tensorflow", "pytorch", "scikit-learn",
            "data science", "big data", "hadoop", "spark", "kafka", "api", "rest", "graphql",
            "microservices", "devops", "ci/cd", "agile", "scrum", "kanban",
        ],
        weight: 1.0,
    },
    DomainProfile {
        name: "gestion",
        keywords: &[
            "comptabilité", "finance", "management", "marketing", "budget", "audit",
            "contrôle de gestion", "ressources humaines", "stratégie", "planification",
            "excel", "powerpoint", "word", "sap", "erp", "crm", "business intelligence",
            "analyse financière", "reporting", "kpi", "tableau de bord", "sage",
            "communication", "négociation", "leadership", "équipe", "projet",
            "qualité", "iso", "lean", "six sigma", "amélioration continue",
        ],
        weight: 1.0,
    },
    DomainProfile {
        name: "électricité et électromécanique",
        keywords: &[
            "circuit", "électronique", "énergie", "schéma", "automate", "plc",
            "moteur", "transformateur", "alternateur", "redresseur", "onduleur",
            "capteur", "actionneur", "régulation", "asservissement", "matlab",
            "simulink", "autocad", "solidworks", "catia", "maintenance",
            "hydraulique", "pneumatique", "mécanique", "thermodynamique",
            "électrotechnique", "automatisme", "robotique", "instrumentation",
        ],
        weight: 1.0,
    },
    DomainProfile {
        name: "génie civil",
        keywords: &[
            "construction", "béton", "architecture", "planification", "btp",
            "structure", "fondation", "charpente", "maçonnerie", "géotechnique",
            "topographie", "autocad", "revit", "archicad", "robot structural",
            "étude de sol", "voirie", "assainissement", "hydraulique urbaine",
            "pont", "tunnel", "barrage", "route", "chemin de fer",
            "métré", "devis", "planning", "suivi de chantier", "sécurité",
        ],
        weight: 1.0,
    },
    DomainProfile {
        name: "logistique et transport",
        keywords: &[
            "supply chain", "approvisionnement", "stock", "entrepôt", "distribution",
            "transport", "logistique", "wms", "erp", "planification", "optimisation",
            "douane", "import", "export", "incoterms", "transit", "fret",
            "manutention", "emballage", "traçabilité", "qualité", "lean",
            "kanban", "juste à temps", "mrp", "forecasting", "demand planning",
        ],
        weight: 1.0,
    },
    DomainProfile {
        name: "ressources humaines",
        keywords: &[
            "recrutement", "formation", "paie", "droit du travail", "sirh",
            "gestion des talents", "évaluation", "performance", "compétences",
            "communication", "relations sociales", "négociation", "médiation",
            "coaching", "développement personnel", "leadership", "management",
            "psychologie", "sociologie", "entretien", "assessment center",
        ],
        weight: 1.0,
    },
];

pub static TRAINING_CORPUS: &[TrainingSet] = &[
    TrainingSet {
        domain: "informatique",
        examples: &[
            "Développeur Python avec 3 ans d'expérience en Django et Flask. Maîtrise de SQL, Git, Docker.",
            "Ingénieur logiciel spécialisé en JavaScript, React, Node.js. Expérience en développement web.",
            "Data Scientist avec compétences en machine learning, TensorFlow, scikit-learn, Python.",
            "Administrateur système Linux, Docker, Kubernetes, AWS. DevOps et CI/CD.",
            "Développeur mobile Android/iOS, Flutter, React Native. Applications mobiles.",
        ],
    },
    TrainingSet {
        domain: "gestion",
        examples: &[
            "Contrôleur de gestion avec expertise en analyse financière, reporting, Excel avancé.",
            "Manager commercial avec expérience en négociation, CRM, développement business.",
            "Consultant en management, stratégie d'entreprise, amélioration des processus.",
            "Responsable marketing digital, SEO, SEM, réseaux sociaux, analytics.",
            "Auditeur interne avec maîtrise des normes ISO, contrôle qualité, audit financier.",
        ],
    },
    TrainingSet {
        domain: "électricité et électromécanique",
        examples: &[
            "Ingénieur électricien spécialisé en automatisme industriel, PLC, SCADA.",
            "Technicien en électronique de puissance, variateurs, moteurs électriques.",
            "Ingénieur en énergies renouvelables, photovoltaïque, éolien.",
            "Automaticien avec expertise en robotique industrielle, capteurs, actionneurs.",
            "Ingénieur maintenance électromécanique, diagnostic, réparation équipements.",
        ],
    },
    TrainingSet {
        domain: "génie civil",
        examples: &[
            "Ingénieur structure spécialisé en béton armé, calcul de structures, Robot Structural.",
            "Conducteur de travaux BTP, planification chantier, suivi qualité, sécurité.",
            "Ingénieur géotechnique, étude de sols, fondations, stabilité des ouvrages.",
            "Architecte avec maîtrise d'AutoCAD, Revit, conception architecturale.",
            "Ingénieur VRD, voirie, réseaux divers, assainissement, hydraulique urbaine.",
        ],
    },
    TrainingSet {
        domain: "logistique et transport",
        examples: &[
            "Responsable supply chain, optimisation des flux, gestion des stocks, WMS.",
            "Logisticien transport international, douane, incoterms, transit.",
            "Gestionnaire d'entrepôt, manutention, préparation commandes, traçabilité.",
            "Planificateur logistique, forecasting, MRP, optimisation des approvisionnements.",
            "Consultant en amélioration continue, lean manufacturing, kaizen.",
        ],
    },
    TrainingSet {
        domain: "ressources humaines",
        examples: &[
            "Responsable recrutement, sourcing candidats, entretiens, assessment.",
            "Gestionnaire paie, droit du travail, SIRH, administration du personnel.",
            "Consultant en formation, ingénierie pédagogique, développement compétences.",
            "DRH généraliste, relations sociales, négociation, management équipes.",
            "Coach professionnel, développement personnel, accompagnement carrière.",
        ],
    },
];

/// Canonical form of a user-supplied domain label.
pub fn canonical_label(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Containment in either direction. Overlapping names can match the wrong
/// entry; callers rely on first-match-wins over a fixed order.
pub fn labels_match(candidate: &str, target: &str) -> bool {
    !target.is_empty() && (target.contains(candidate) || candidate.contains(target))
}

/// First domain in table order whose name matches `input`.
pub fn resolve_domain(input: &str) -> Option<&'static DomainProfile> {
    let target = canonical_label(input);
    DOMAINS
        .iter()
        .find(|domain| labels_match(domain.name, &target))
}

/// Every (label, sentence) pair of the training corpus, in table order.
pub fn training_examples() -> impl Iterator<Item = (&'static str, &'static str)> {
    TRAINING_CORPUS
        .iter()
        .flat_map(|set| set.examples.iter().map(move |example| (set.domain, *example)))
}
