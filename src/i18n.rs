use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    #[default]
    Es,
    Pt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Default,
    ServerOnline,
    ServerOffline,
    MorningReminder,
    EveningReminder,
    ReminderTitle,
    BestPools,
    WhyReview,
    WhyReviewText,
    UsefulCommands,
    CommandsText,
    NextReminder,
    In12Hours,
    Status,
    LastCheck,
    NoData,
}

impl Lang {
    pub const ALL: [Lang; 3] = [Lang::En, Lang::Es, Lang::Pt];

    /// Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "es" => Lang::Es,
            "pt" => Lang::Pt,
            _ => Lang::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Es => "es",
            Lang::Pt => "pt",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Es => "Español",
            Lang::Pt => "Português",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Lang::En => "🇺🇸",
            Lang::Es => "🇪🇸",
            Lang::Pt => "🇧🇷",
        }
    }

    pub fn text(self, key: Text) -> &'static str {
        match self {
            Lang::En => en(key),
            Lang::Es => es(key),
            Lang::Pt => pt(key),
        }
    }
}

fn en(key: Text) -> &'static str {
    match key {
        Text::Default => "🤖 **AI Assistant for Hoops Finance**\n\nI can help you with questions about DeFi, liquidity pools, and the Hoops Finance platform. Use `/help` to see available commands.",
        Text::ServerOnline => "Hoops Finance server is running correctly",
        Text::ServerOffline => "⚠️ **ALERT**: Hoops Finance server is down",
        Text::MorningReminder => "🌅 **Daily Hoops Finance Server Check**",
        Text::EveningReminder => "🌙 **Evening Hoops Finance Pool Reminder**",
        Text::ReminderTitle => "Time to review your positions on Hoops Finance",
        Text::BestPools => "🏆 Best pools",
        Text::WhyReview => "❓ Why review?",
        Text::WhyReviewText => "APR and liquidity change throughout the day. Checking regularly helps you keep your liquidity where it earns the most.",
        Text::UsefulCommands => "🛠️ Useful commands",
        Text::CommandsText => "`/best-pools` - Best pools by APY\n`/status-server` - Check server\n`/ask` - Ask the AI",
        Text::NextReminder => "⏰ Next reminder",
        Text::In12Hours => "In about 12 hours",
        Text::Status => "📊 Status",
        Text::LastCheck => "⏰ Last check",
        Text::NoData => "No data available",
    }
}

fn es(key: Text) -> &'static str {
    match key {
        Text::Default => "🤖 **Asistente de IA para Hoops Finance**\n\nPuedo ayudarte con preguntas sobre DeFi, pools de liquidez y la plataforma Hoops Finance. Usa `/help` para ver comandos disponibles.",
        Text::ServerOnline => "El servidor de Hoops Finance está funcionando correctamente",
        Text::ServerOffline => "⚠️ **ALERTA**: El servidor de Hoops Finance está caído",
        Text::MorningReminder => "🌅 **Verificación Diaria del Servidor Hoops Finance**",
        Text::EveningReminder => "🌙 **Recordatorio Nocturno de Pools Hoops Finance**",
        Text::ReminderTitle => "Es momento de revisar tus posiciones en Hoops Finance",
        Text::BestPools => "🏆 Mejores pools",
        Text::WhyReview => "❓ ¿Por qué revisar?",
        Text::WhyReviewText => "El APR y la liquidez cambian durante el día. Revisar con frecuencia te ayuda a mantener tu liquidez donde más rinde.",
        Text::UsefulCommands => "🛠️ Comandos útiles",
        Text::CommandsText => "`/best-pools` - Mejores pools por APY\n`/status-server` - Verificar servidor\n`/ask` - Pregunta a la IA",
        Text::NextReminder => "⏰ Próximo recordatorio",
        Text::In12Hours => "En unas 12 horas",
        Text::Status => "📊 Estado",
        Text::LastCheck => "⏰ Última verificación",
        Text::NoData => "No hay datos disponibles",
    }
}

fn pt(key: Text) -> &'static str {
    match key {
        Text::Default => "🤖 **Assistente de IA para Hoops Finance**\n\nPosso ajudar com perguntas sobre DeFi, pools de liquidez e a plataforma Hoops Finance. Use `/help` para ver comandos disponíveis.",
        Text::ServerOnline => "O servidor Hoops Finance está funcionando corretamente",
        Text::ServerOffline => "⚠️ **ALERTA**: O servidor Hoops Finance está fora do ar",
        Text::MorningReminder => "🌅 **Verificação Diária do Servidor Hoops Finance**",
        Text::EveningReminder => "🌙 **Lembrete Noturno de Pools Hoops Finance**",
        Text::ReminderTitle => "Hora de revisar suas posições na Hoops Finance",
        Text::BestPools => "🏆 Melhores pools",
        Text::WhyReview => "❓ Por que revisar?",
        Text::WhyReviewText => "O APR e a liquidez mudam ao longo do dia. Revisar com frequência ajuda a manter sua liquidez onde ela rende mais.",
        Text::UsefulCommands => "🛠️ Comandos úteis",
        Text::CommandsText => "`/best-pools` - Melhores pools por APY\n`/status-server` - Verificar servidor\n`/ask` - Pergunte à IA",
        Text::NextReminder => "⏰ Próximo lembrete",
        Text::In12Hours => "Em cerca de 12 horas",
        Text::Status => "📊 Status",
        Text::LastCheck => "⏰ Última verificação",
        Text::NoData => "Nenhum dado disponível",
    }
}
